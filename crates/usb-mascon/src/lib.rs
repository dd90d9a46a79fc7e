//! Emulated TAITO Densha de GO! mascon USB device.
//!
//! Sits between the host input layer and the USB transport:
//!
//! - bindings: normalized host values in, lever/D-pad/button state out
//! - [`MasconState`]: per-device state answering control and interrupt traffic
//! - [`MasconDevice`]: the registry-facing proxy (metadata, creation, save state)
//!
//! Report encoding and descriptors live in `densha-hid-mascon-protocol`.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod bindings;
pub mod freeze;
pub mod proxy;
pub mod settings;
pub mod state;
pub mod usb;

pub use bindings::{BindingKind, GenericInputBinding, InputBindingInfo, binding_info};
pub use freeze::{MASCON_FREEZE_MARKER, SaveState, SnapshotReader, SnapshotWriter};
pub use proxy::{DeviceProxy, MasconDevice};
pub use settings::{MasconSettings, SettingInfo, SettingKind, TRACE_REPORTS_ENV};
pub use state::MasconState;
pub use usb::{
    ControlHandler, ControlResponse, PacketStatus, SetupPacket, StandardControlHandler,
    UsbDeviceModel, UsbDeviceRecord, UsbPacket, UsbToken,
};

pub use densha_hid_mascon_protocol::{ControlId, MasconError, MasconVariant};

use thiserror::Error;

/// Device creation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Unsupported device subtype: {0}")]
    UnsupportedSubtype(u32),

    #[error("Unsupported mascon variant: {0}")]
    UnsupportedVariant(MasconVariant),

    #[error("Descriptor setup failed: {0}")]
    Descriptor(#[from] MasconError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Save-state failures. A failed load leaves the device untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Save state marker mismatch: expected {expected:?}, found {found:?}")]
    MarkerMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Save state truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Save state has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("Save state marker is {0} bytes, longer than a u32 length prefix")]
    MarkerTooLong(usize),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DeviceError::UnsupportedSubtype(7).to_string(),
            "Unsupported device subtype: 7"
        );
        assert_eq!(
            DeviceError::UnsupportedVariant(MasconVariant::Ryojouhen).to_string(),
            "Unsupported mascon variant: Ryojouhen"
        );
        assert_eq!(
            SnapshotError::TrailingBytes(3).to_string(),
            "Save state has 3 trailing bytes"
        );
    }

    #[test]
    fn test_descriptor_error_conversion() {
        let err: DeviceError = MasconError::InvalidDescriptor {
            kind: "configuration",
            reason: "no interfaces".to_string(),
        }
        .into();
        assert!(matches!(err, DeviceError::Descriptor(_)));
        assert_eq!(
            err.to_string(),
            "Descriptor setup failed: Invalid configuration descriptor: no interfaces"
        );
    }
}
