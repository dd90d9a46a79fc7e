//! Per-device controller state and its USB entry points.

use std::fmt;

use densha_hid_mascon_protocol::descriptors::INTERRUPT_IN_ENDPOINT;
use densha_hid_mascon_protocol::{
    DescriptorSet, DpadState, HAT_NEUTRAL, MasconInputState, MasconReportEncoder, MasconResult,
    MasconVariant, REPORT_LEN,
};
use tracing::{debug, warn};

use crate::settings::MasconSettings;
use crate::usb::{
    ControlHandler, ControlResponse, PacketStatus, SetupPacket, StandardControlHandler,
    UsbDeviceModel, UsbDeviceRecord, UsbPacket, UsbToken,
};
use crate::{DeviceError, DeviceResult};

/// Live input of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MasconData {
    pub power: u8,
    pub brake: u8,
    pub dpad: DpadState,
    pub hat_switch: u8,
    /// Canonical button mask, bit `n` is binding `B + n`.
    pub buttons: u8,
}

impl Default for MasconData {
    fn default() -> Self {
        Self {
            power: 0,
            brake: 0,
            dpad: DpadState::default(),
            hat_switch: HAT_NEUTRAL,
            buttons: 0,
        }
    }
}

/// One emulated mascon plugged into a port.
pub struct MasconState {
    pub(crate) dev: UsbDeviceRecord,
    pub(crate) port: u32,
    pub(crate) variant: MasconVariant,
    pub(crate) settings: MasconSettings,
    pub(crate) data: MasconData,
    encoder: MasconReportEncoder,
    control: Box<dyn ControlHandler>,
}

impl fmt::Debug for MasconState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasconState")
            .field("port", &self.port)
            .field("variant", &self.variant)
            .field("settings", &self.settings)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl MasconState {
    /// Create a controller for `variant` on `port`.
    ///
    /// Only models with a known report layout can be created.
    pub fn new(port: u32, variant: MasconVariant) -> DeviceResult<Self> {
        match variant {
            MasconVariant::Type2 | MasconVariant::Shinkansen => {}
            MasconVariant::Ryojouhen => {
                warn!("Mascon {} has no known report layout", variant);
                return Err(DeviceError::UnsupportedVariant(variant));
            }
        }
        Self::with_descriptors(port, variant, DescriptorSet::for_variant(variant))
    }

    pub(crate) fn with_descriptors(
        port: u32,
        variant: MasconVariant,
        descriptors: DescriptorSet,
    ) -> DeviceResult<Self> {
        let dev = UsbDeviceRecord::new(port, descriptors).inspect_err(|e| {
            warn!("Mascon {} descriptor setup failed on port {}: {}", variant, port, e);
        })?;

        let mut state = Self {
            dev,
            port,
            variant,
            settings: MasconSettings::default(),
            data: MasconData::default(),
            encoder: MasconReportEncoder::new(variant),
            control: Box::new(StandardControlHandler),
        };
        state.reset();

        debug!("Created mascon {} on port {}", variant, port);
        Ok(state)
    }

    /// Swap the control-transfer responder.
    pub fn with_control_handler(mut self, handler: impl ControlHandler + 'static) -> Self {
        self.control = Box::new(handler);
        self
    }

    pub fn port(&self) -> u32 {
        self.port
    }

    pub fn variant(&self) -> MasconVariant {
        self.variant
    }

    pub fn settings(&self) -> &MasconSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: &MasconSettings) {
        if self.settings != *settings {
            debug!("Mascon port {} settings: {:?}", self.port, settings);
        }
        self.settings = settings.clone();
    }

    pub fn passthrough(&self) -> bool {
        self.settings.passthrough
    }

    pub fn power(&self) -> u8 {
        self.data.power
    }

    pub fn brake(&self) -> u8 {
        self.data.brake
    }

    pub fn buttons(&self) -> u8 {
        self.data.buttons
    }

    pub fn hat_switch(&self) -> u8 {
        self.data.hat_switch
    }

    pub fn dpad(&self) -> DpadState {
        self.data.dpad
    }

    /// Return the levers to rest. D-pad and buttons are left alone.
    pub fn reset(&mut self) {
        self.data.power = 0;
        self.data.brake = 0;
    }

    pub(crate) fn update_hat_switch(&mut self) {
        self.data.hat_switch = self.data.dpad.hat_switch();
    }

    pub fn input_state(&self) -> MasconInputState {
        MasconInputState {
            power: self.data.power,
            brake: self.data.brake,
            dpad: self.data.dpad,
            buttons: self.data.buttons,
        }
    }

    /// Produce the next interrupt IN report.
    pub fn token_in(&mut self, out: &mut [u8; REPORT_LEN]) -> MasconResult<usize> {
        self.update_hat_switch();
        let len = self.encoder.encode_into(&self.input_state(), out)?;
        if self.settings.trace_reports {
            debug!("Mascon port {} report: {:02X?}", self.port, &out[..len]);
        }
        Ok(len)
    }
}

impl UsbDeviceModel for MasconState {
    fn record(&self) -> &UsbDeviceRecord {
        &self.dev
    }

    fn handle_attach(&mut self) {
        self.dev.attach();
        self.reset();
    }

    fn handle_reset(&mut self) {
        self.reset();
    }

    fn handle_control(&mut self, packet: &mut UsbPacket, setup: &SetupPacket, data: Option<&[u8]>) {
        match self.control.handle_control(&mut self.dev, setup, data) {
            ControlResponse::Data(bytes) => {
                packet.push_data(&bytes);
            }
            ControlResponse::Ack => {}
            ControlResponse::Stall => packet.status = PacketStatus::Stall,
        }
    }

    fn handle_data(&mut self, packet: &mut UsbPacket) {
        match packet.pid {
            UsbToken::In if packet.endpoint == INTERRUPT_IN_ENDPOINT => {
                let mut report = [0u8; REPORT_LEN];
                match self.token_in(&mut report) {
                    Ok(len) => {
                        packet.push_data(&report[..len]);
                    }
                    Err(e) => {
                        warn!("Mascon port {} report failed: {}", self.port, e);
                        packet.status = PacketStatus::IoError;
                    }
                }
            }
            _ => packet.status = PacketStatus::Stall,
        }
    }
}
