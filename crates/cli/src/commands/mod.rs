//! Command implementations for denshactl

pub mod bindings;
pub mod descriptors;
pub mod report;
pub mod state;

use std::path::PathBuf;

use clap::{Args, Subcommand};
use densha_usb_mascon::{
    ControlId, DeviceProxy, MasconDevice, MasconState, MasconVariant, PacketStatus,
    UsbDeviceModel, UsbPacket,
};
use densha_hid_mascon_protocol::{MasconError, REPORT_LEN};
use densha_hid_mascon_protocol::descriptors::INTERRUPT_IN_ENDPOINT;
use tracing::debug;

use crate::config::DenshaConfig;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum Commands {
    /// Encode one interrupt report from the given inputs
    Report {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the descriptors a model presents during enumeration
    Descriptors {
        /// Controller model (type2, shinkansen, ryojouhen)
        #[arg(long)]
        variant: Option<MasconVariant>,
    },

    /// List the input bindings of a model
    Bindings {
        /// Controller model (type2, shinkansen, ryojouhen)
        #[arg(long)]
        variant: Option<MasconVariant>,
    },

    /// Write a save-state blob
    Save {
        #[command(flatten)]
        input: InputArgs,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Restore a save-state blob and print the resulting report
    Load {
        /// Controller model (type2, shinkansen, ryojouhen)
        #[arg(long)]
        variant: Option<MasconVariant>,
        /// Save-state file
        file: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Live input applied to a freshly created controller.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Controller model (type2, shinkansen, ryojouhen)
    #[arg(long)]
    pub variant: Option<MasconVariant>,

    /// Power lever, 0.0 (released) to 1.0 (full)
    #[arg(long, default_value_t = 0.0)]
    pub power: f32,

    /// Brake lever, 0.0 (released) to 1.0 (emergency)
    #[arg(long, default_value_t = 0.0)]
    pub brake: f32,

    #[arg(long)]
    pub up: bool,

    #[arg(long)]
    pub down: bool,

    #[arg(long)]
    pub left: bool,

    #[arg(long)]
    pub right: bool,

    /// Press a button (A, B, C, D, Select, Start); repeatable
    #[arg(short, long = "button", value_name = "NAME")]
    pub buttons: Vec<String>,
}

/// Shared command context.
pub struct Context {
    pub json: bool,
    pub config: DenshaConfig,
}

impl Context {
    /// Model from the command line, falling back to the configuration file.
    pub fn variant(&self, arg: Option<MasconVariant>) -> MasconVariant {
        arg.unwrap_or(self.config.variant)
    }

    pub fn create_device(&self, variant: MasconVariant) -> Result<MasconState, CliError> {
        let device = MasconDevice.create_device(
            &self.config.device,
            self.config.port,
            variant.subtype(),
        )?;
        Ok(device)
    }
}

fn bind(device: &mut MasconState, control: ControlId, value: f32) {
    MasconDevice.set_binding_value(device, control.index(), value);
}

/// Drive the bindings named by `input`.
pub fn apply_inputs(device: &mut MasconState, input: &InputArgs) -> Result<(), CliError> {
    bind(device, ControlId::Power, input.power);
    bind(device, ControlId::Brake, input.brake);

    for (pressed, control) in [
        (input.up, ControlId::Up),
        (input.down, ControlId::Down),
        (input.left, ControlId::Left),
        (input.right, ControlId::Right),
    ] {
        if pressed {
            bind(device, control, 1.0);
        }
    }

    for name in &input.buttons {
        let control = ControlId::from_name(name)
            .filter(|c| c.button_mask().is_some())
            .ok_or_else(|| CliError::UnknownControl(name.clone()))?;
        bind(device, control, 1.0);
    }
    Ok(())
}

/// Poll the interrupt endpoint once, the way a host would.
pub fn poll_report(device: &mut MasconState) -> Result<Vec<u8>, CliError> {
    let mut packet = UsbPacket::token_in(INTERRUPT_IN_ENDPOINT, REPORT_LEN);
    device.handle_data(&mut packet);
    debug!("Interrupt IN status {:?}, {} bytes", packet.status, packet.actual_length());
    packet_result(device.variant(), packet)
}

/// Report bytes of a completed IN transfer, or why it failed.
fn packet_result(variant: MasconVariant, packet: UsbPacket) -> Result<Vec<u8>, CliError> {
    match packet.status {
        PacketStatus::Success => Ok(packet.data),
        PacketStatus::Stall => Err(CliError::Stalled(packet.endpoint | 0x80)),
        PacketStatus::IoError => Err(MasconError::UnsupportedVariant(variant).into()),
    }
}
