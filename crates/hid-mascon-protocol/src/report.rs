//! Interrupt IN report encoding.
//!
//! Byte layouts (6 bytes on every model that encodes):
//!
//! | Byte | Type 2 | Shinkansen |
//! |------|--------|------------|
//! | 0 | `0x01` tag | brake notch |
//! | 1 | brake notch | power notch |
//! | 2 | power notch | horn `0xFF` |
//! | 3 | horn `0xFF` | hat nibble |
//! | 4 | hat nibble | buttons |
//! | 5 | buttons | `0x00` pad |
//!
//! Button C doubles as the horn on the real hardware; the horn axis is never
//! driven and always reports `0xFF`.
//!
//! No report layout is known for the Ryojouhen, which has 7 buttons and 3 pad
//! bytes. Encoding it fails rather than guessing.

use tracing::trace;

use crate::buttons::remap_buttons;
use crate::hat::DpadState;
use crate::notch::NotchTable;
use crate::types::{MasconVariant, button_bits};
use crate::{MasconError, MasconResult};

/// Wire size of every mascon input report.
pub const REPORT_LEN: usize = 6;

/// Leading byte of the Type 2 report.
pub const TYPE2_REPORT_TAG: u8 = 0x01;

/// Horn axis value; the horn is never driven.
pub const HORN_INACTIVE: u8 = 0xFF;

pub mod type2_offsets {
    pub const TAG: usize = 0;
    pub const BRAKE: usize = 1;
    pub const POWER: usize = 2;
    pub const HORN: usize = 3;
    pub const HAT: usize = 4;
    pub const BUTTONS: usize = 5;
}

pub mod shinkansen_offsets {
    pub const BRAKE: usize = 0;
    pub const POWER: usize = 1;
    pub const HORN: usize = 2;
    pub const HAT: usize = 3;
    pub const BUTTONS: usize = 4;
    pub const PAD: usize = 5;
}

/// Raw controller inputs consumed by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasconInputState {
    /// Power lever, 255 is fully applied.
    pub power: u8,
    /// Brake lever, 255 is fully applied.
    pub brake: u8,
    pub dpad: DpadState,
    /// Canonical button mask, see [`button_bits`].
    pub buttons: u8,
}

/// Per-model report encoder.
#[derive(Debug, Clone, Copy)]
pub struct MasconReportEncoder {
    variant: MasconVariant,
    power: NotchTable,
    brake: NotchTable,
}

impl MasconReportEncoder {
    pub fn new(variant: MasconVariant) -> Self {
        Self {
            variant,
            power: NotchTable::power(variant),
            brake: NotchTable::brake(variant),
        }
    }

    pub fn variant(&self) -> MasconVariant {
        self.variant
    }

    /// Encode `state` into `out`, returning the number of bytes written.
    ///
    /// `out` is left untouched when the model has no known report layout.
    pub fn encode_into(
        &self,
        state: &MasconInputState,
        out: &mut [u8; REPORT_LEN],
    ) -> MasconResult<usize> {
        let hat = state.dpad.hat_switch() & 0x0F;
        let buttons = remap_buttons(self.variant, state.buttons & button_bits::ALL);
        let power = self.power.quantize(state.power);
        let brake = self.brake.quantize(state.brake);

        match self.variant {
            MasconVariant::Type2 => {
                out[type2_offsets::TAG] = TYPE2_REPORT_TAG;
                out[type2_offsets::BRAKE] = brake;
                out[type2_offsets::POWER] = power;
                out[type2_offsets::HORN] = HORN_INACTIVE;
                out[type2_offsets::HAT] = hat;
                out[type2_offsets::BUTTONS] = buttons;
            }
            MasconVariant::Shinkansen => {
                out[shinkansen_offsets::BRAKE] = brake;
                out[shinkansen_offsets::POWER] = power;
                out[shinkansen_offsets::HORN] = HORN_INACTIVE;
                out[shinkansen_offsets::HAT] = hat;
                out[shinkansen_offsets::BUTTONS] = buttons;
                out[shinkansen_offsets::PAD] = 0x00;
            }
            MasconVariant::Ryojouhen => {
                return Err(MasconError::UnsupportedVariant(self.variant));
            }
        }

        trace!(
            "Mascon {:?} power: {:02X} (raw: {:02X}) brake: {:02X} (raw: {:02X}) hat: {} buttons: {:02X}",
            self.variant, power, state.power, brake, state.brake, hat, buttons
        );

        Ok(REPORT_LEN)
    }

    /// Encode `state` into a fresh report buffer.
    pub fn encode(&self, state: &MasconInputState) -> MasconResult<[u8; REPORT_LEN]> {
        let mut out = [0u8; REPORT_LEN];
        self.encode_into(state, &mut out)?;
        Ok(out)
    }
}

/// Encode a report for `variant` from raw inputs.
pub fn encode_report(
    variant: MasconVariant,
    state: &MasconInputState,
) -> MasconResult<[u8; REPORT_LEN]> {
    MasconReportEncoder::new(variant).encode(state)
}
