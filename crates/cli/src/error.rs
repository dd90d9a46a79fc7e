//! Error types for denshactl

use densha_hid_mascon_protocol::MasconError;
use densha_usb_mascon::{DeviceError, SnapshotError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown control: {0}")]
    UnknownControl(String),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Report error: {0}")]
    Report(#[from] MasconError),

    #[error("Invalid save state: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Interrupt endpoint {0:#04x} stalled")]
    Stalled(u8),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Device(_) | CliError::Report(_) | CliError::Stalled(_) => 2,
            CliError::Snapshot(_) => 3,
            CliError::UnknownControl(_)
            | CliError::JsonError(_)
            | CliError::YamlError(_) => 4,
            CliError::IoError(_) => 1,
        }
    }
}
