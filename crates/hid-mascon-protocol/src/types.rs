//! Controller model classification and logical control identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MasconError;
use crate::ids::{PRODUCT_RYOJOUHEN, PRODUCT_SHINKANSEN, PRODUCT_TYPE2};

/// Cataloged mascon controller model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasconVariant {
    /// Two-handle controller, TCPP20009.
    #[default]
    Type2,
    /// Shinkansen controller, TCPP20011.
    Shinkansen,
    /// Ryojouhen controller, TCPP20014.
    Ryojouhen,
}

impl MasconVariant {
    /// Every cataloged model, in subtype order.
    pub const ALL: [MasconVariant; 3] = [
        MasconVariant::Type2,
        MasconVariant::Shinkansen,
        MasconVariant::Ryojouhen,
    ];

    /// Map a host subtype index to a model.
    pub fn from_subtype(subtype: u32) -> Option<Self> {
        match subtype {
            0 => Some(MasconVariant::Type2),
            1 => Some(MasconVariant::Shinkansen),
            2 => Some(MasconVariant::Ryojouhen),
            _ => None,
        }
    }

    /// Host subtype index of this model.
    pub fn subtype(self) -> u32 {
        match self {
            MasconVariant::Type2 => 0,
            MasconVariant::Shinkansen => 1,
            MasconVariant::Ryojouhen => 2,
        }
    }

    /// Construct a model from a USB product ID, returning `None` for unknown PIDs.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            PRODUCT_TYPE2 => Some(MasconVariant::Type2),
            PRODUCT_SHINKANSEN => Some(MasconVariant::Shinkansen),
            PRODUCT_RYOJOUHEN => Some(MasconVariant::Ryojouhen),
            _ => None,
        }
    }

    pub fn product_id(self) -> u16 {
        match self {
            MasconVariant::Type2 => PRODUCT_TYPE2,
            MasconVariant::Shinkansen => PRODUCT_SHINKANSEN,
            MasconVariant::Ryojouhen => PRODUCT_RYOJOUHEN,
        }
    }

    /// `bDeviceSubClass` reported in the device descriptor.
    pub fn device_subclass(self) -> u8 {
        match self {
            MasconVariant::Type2 => 0x04,
            MasconVariant::Shinkansen => 0x05,
            MasconVariant::Ryojouhen => 0xFF,
        }
    }

    /// Number of buttons declared by the HID report descriptor.
    pub fn button_count(self) -> u8 {
        match self {
            MasconVariant::Type2 | MasconVariant::Shinkansen => 6,
            MasconVariant::Ryojouhen => 7,
        }
    }

    /// Human-readable model name.
    pub fn name(self) -> &'static str {
        match self {
            MasconVariant::Type2 => "Type 2",
            MasconVariant::Shinkansen => "Shinkansen",
            MasconVariant::Ryojouhen => "Ryojouhen",
        }
    }

    /// TAITO model code.
    pub fn model_code(self) -> &'static str {
        match self {
            MasconVariant::Type2 => "TCPP20009",
            MasconVariant::Shinkansen => "TCPP20011",
            MasconVariant::Ryojouhen => "TCPP20014",
        }
    }
}

impl fmt::Display for MasconVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MasconVariant {
    type Err = MasconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type2" | "type-2" | "type 2" | "type_2" | "tcpp20009" | "0" => {
                Ok(MasconVariant::Type2)
            }
            "shinkansen" | "tcpp20011" | "1" => Ok(MasconVariant::Shinkansen),
            "ryojouhen" | "tcpp20014" | "2" => Ok(MasconVariant::Ryojouhen),
            _ => Err(MasconError::UnknownVariant(s.to_string())),
        }
    }
}

/// Canonical button bits, in binding order.
///
/// Type 2 hardware sends its buttons in exactly this order, so the canonical
/// mask is also the Type 2 wire byte.
pub mod button_bits {
    pub const B: u8 = 1 << 0;
    pub const A: u8 = 1 << 1;
    pub const C: u8 = 1 << 2;
    pub const D: u8 = 1 << 3;
    pub const SELECT: u8 = 1 << 4;
    pub const START: u8 = 1 << 5;

    /// Every bit a binding can set.
    pub const ALL: u8 = B | A | C | D | SELECT | START;
}

/// Logical control identifier, i.e. the binding index seen by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ControlId {
    Power = 0,
    Brake = 1,
    Up = 2,
    Right = 3,
    Down = 4,
    Left = 5,
    B = 6,
    A = 7,
    C = 8,
    D = 9,
    Select = 10,
    Start = 11,
}

impl ControlId {
    /// Number of binding indices.
    pub const COUNT: u32 = 12;

    /// First button binding index; button bits are numbered from here.
    pub const BUTTONS_OFFSET: u32 = ControlId::B as u32;

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(ControlId::Power),
            1 => Some(ControlId::Brake),
            2 => Some(ControlId::Up),
            3 => Some(ControlId::Right),
            4 => Some(ControlId::Down),
            5 => Some(ControlId::Left),
            6 => Some(ControlId::B),
            7 => Some(ControlId::A),
            8 => Some(ControlId::C),
            9 => Some(ControlId::D),
            10 => Some(ControlId::Select),
            11 => Some(ControlId::Start),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Canonical button bit for button controls, `None` for axes and directions.
    pub fn button_mask(self) -> Option<u8> {
        match self {
            ControlId::B => Some(button_bits::B),
            ControlId::A => Some(button_bits::A),
            ControlId::C => Some(button_bits::C),
            ControlId::D => Some(button_bits::D),
            ControlId::Select => Some(button_bits::SELECT),
            ControlId::Start => Some(button_bits::START),
            _ => None,
        }
    }

    /// Look a control up by its binding name ("Power", "A", "Select", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let control = match name.trim().to_ascii_lowercase().as_str() {
            "power" => ControlId::Power,
            "brake" => ControlId::Brake,
            "up" => ControlId::Up,
            "right" => ControlId::Right,
            "down" => ControlId::Down,
            "left" => ControlId::Left,
            "a" => ControlId::A,
            "b" => ControlId::B,
            "c" => ControlId::C,
            "d" => ControlId::D,
            "select" => ControlId::Select,
            "start" => ControlId::Start,
            _ => return None,
        };
        Some(control)
    }
}
