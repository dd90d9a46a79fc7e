//! TAITO Densha de GO! mascon controller USB HID protocol.
//!
//! Encodes generic lever, D-pad and button input into the exact interrupt IN
//! reports the real train controllers produce, and carries the descriptors
//! they present during enumeration.
//!
//! This crate is I/O-free. It provides pure functions and constant tables
//! that can be tested without any USB transport.
//!
//! ## Models
//! - Type 2 (TCPP20009): two-handle controller, 6 power / 10 brake detents
//! - Shinkansen (TCPP20011): 14 power / 9 brake detents
//! - Ryojouhen (TCPP20014): descriptors only, no known report layout

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod buttons;
pub mod descriptors;
pub mod hat;
pub mod ids;
pub mod notch;
pub mod report;
pub mod types;
pub mod validate;

pub use buttons::{remap_buttons, shinkansen_buttons, type2_buttons};
pub use descriptors::{DescriptorSet, StringTable};
pub use hat::{DpadState, HAT_NEUTRAL, HatDirection};
pub use ids::{
    PRODUCT_RYOJOUHEN, PRODUCT_SHINKANSEN, PRODUCT_TYPE2, VENDOR_ID, is_mascon, product_name,
};
pub use notch::{LeverAxis, Notch, NotchTable, quantize_brake, quantize_power};
pub use report::{
    HORN_INACTIVE, MasconInputState, MasconReportEncoder, REPORT_LEN, TYPE2_REPORT_TAG,
    encode_report,
};
pub use types::{ControlId, MasconVariant, button_bits};
pub use validate::{ConfigDescriptor, DeviceDescriptor, EndpointDescriptor, InterfaceDescriptor};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MasconError {
    #[error("Unsupported mascon variant: {0}")]
    UnsupportedVariant(MasconVariant),

    #[error("Unknown mascon variant: {0}")]
    UnknownVariant(String),

    #[error("Invalid {kind} descriptor: {reason}")]
    InvalidDescriptor { kind: &'static str, reason: String },
}

pub type MasconResult<T> = Result<T, MasconError>;
