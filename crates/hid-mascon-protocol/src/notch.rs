//! Lever notch quantization.
//!
//! The physical levers have detents, and each detent reports one fixed byte.
//! A continuous host axis in `0..=255` is snapped onto those codes by scanning
//! a descending threshold table and taking the first entry whose threshold is
//! at or below the raw value.
//!
//! The tables are calibration data captured from real hardware. Outputs are
//! listed per table in lever order, e.g. Type 2 power runs from `0x81` (N) to
//! `0x00` (P5).

use crate::types::MasconVariant;

/// One lever detent: raw inputs at or above `threshold` report `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notch {
    pub threshold: u8,
    pub output: u8,
}

const fn notch(threshold: u8, output: u8) -> Notch {
    Notch { threshold, output }
}

/// Lever axis a table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeverAxis {
    Power,
    Brake,
}

/// Descending `(threshold, output)` table for one lever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotchTable {
    notches: &'static [Notch],
}

// (N) 0x81 0x6D 0x54 0x3F 0x21 0x00 (P5)
const TYPE2_POWER: &[Notch] = &[
    notch(0xF8, 0x00),
    notch(0xC8, 0x21),
    notch(0x98, 0x3F),
    notch(0x58, 0x54),
    notch(0x28, 0x6D),
    notch(0x00, 0x81),
];

// (NB) 0x79 0x8A 0x94 0x9A 0xA2 0xA8 0xAF 0xB2 0xB5 0xB9 (EB)
const TYPE2_BRAKE: &[Notch] = &[
    notch(0xF8, 0xB9),
    notch(0xE6, 0xB5),
    notch(0xCA, 0xB2),
    notch(0xAE, 0xAF),
    notch(0x92, 0xA8),
    notch(0x76, 0xA2),
    notch(0x5A, 0x9A),
    notch(0x3E, 0x94),
    notch(0x22, 0x8A),
    notch(0x00, 0x79),
];

// (N) 0x12 0x24 0x36 0x48 0x5A 0x6C 0x7E 0x90 0xA2 0xB4 0xC6 0xD7 0xE9 0xFB (P13)
const SHINKANSEN_POWER: &[Notch] = &[
    notch(0xF7, 0xFB),
    notch(0xE4, 0xE9),
    notch(0xD1, 0xD7),
    notch(0xBE, 0xC6),
    notch(0xAB, 0xB4),
    notch(0x98, 0xA2),
    notch(0x85, 0x90),
    notch(0x72, 0x7E),
    notch(0x5F, 0x6C),
    notch(0x4C, 0x5A),
    notch(0x39, 0x48),
    notch(0x26, 0x36),
    notch(0x13, 0x24),
    notch(0x00, 0x12),
];

// (NB) 0x1C 0x38 0x54 0x70 0x8B 0xA7 0xC3 0xDF 0xFB (EB)
const SHINKANSEN_BRAKE: &[Notch] = &[
    notch(0xF8, 0xFB),
    notch(0xCA, 0xDF),
    notch(0xAE, 0xC3),
    notch(0x92, 0xA7),
    notch(0x76, 0x8B),
    notch(0x5A, 0x70),
    notch(0x3E, 0x54),
    notch(0x22, 0x38),
    notch(0x00, 0x1C),
];

impl NotchTable {
    /// Table for the given model and lever. Ryojouhen shares the Shinkansen levers.
    pub fn for_axis(variant: MasconVariant, axis: LeverAxis) -> Self {
        let notches = match (variant, axis) {
            (MasconVariant::Type2, LeverAxis::Power) => TYPE2_POWER,
            (MasconVariant::Type2, LeverAxis::Brake) => TYPE2_BRAKE,
            (MasconVariant::Shinkansen | MasconVariant::Ryojouhen, LeverAxis::Power) => {
                SHINKANSEN_POWER
            }
            (MasconVariant::Shinkansen | MasconVariant::Ryojouhen, LeverAxis::Brake) => {
                SHINKANSEN_BRAKE
            }
        };
        Self { notches }
    }

    pub fn power(variant: MasconVariant) -> Self {
        Self::for_axis(variant, LeverAxis::Power)
    }

    pub fn brake(variant: MasconVariant) -> Self {
        Self::for_axis(variant, LeverAxis::Brake)
    }

    /// Snap a raw lever position onto the detent code the hardware would report.
    pub fn quantize(&self, raw: u8) -> u8 {
        self.notches
            .iter()
            .find(|n| raw >= n.threshold)
            .or(self.notches.last())
            .map_or(0, |n| n.output)
    }

    pub fn notches(&self) -> &'static [Notch] {
        self.notches
    }

    /// Number of distinct lever positions.
    pub fn len(&self) -> usize {
        self.notches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notches.is_empty()
    }
}

/// Quantize the power lever for a model.
pub fn quantize_power(variant: MasconVariant, raw: u8) -> u8 {
    NotchTable::power(variant).quantize(raw)
}

/// Quantize the brake lever for a model.
pub fn quantize_brake(variant: MasconVariant, raw: u8) -> u8 {
    NotchTable::brake(variant).quantize(raw)
}
