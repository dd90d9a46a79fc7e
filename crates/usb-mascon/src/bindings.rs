//! Host input bindings.
//!
//! The host input layer addresses controls by binding index (see
//! [`ControlId`]) with normalized values in `0.0..=1.0`.

use densha_hid_mascon_protocol::{ControlId, MasconVariant};
use serde::Serialize;

use crate::state::MasconState;

/// How the host should drive a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Axis,
    Button,
}

/// Generic pad control a binding maps to by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericInputBinding {
    LeftStickUp,
    LeftStickDown,
    DPadUp,
    DPadRight,
    DPadDown,
    DPadLeft,
    Cross,
    Square,
    Circle,
    Triangle,
    Select,
    Start,
}

/// Metadata for one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputBindingInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: BindingKind,
    pub control: ControlId,
    pub generic: GenericInputBinding,
}

impl InputBindingInfo {
    pub fn bind_index(&self) -> u32 {
        self.control.index()
    }
}

const fn binding(
    name: &'static str,
    display_name: &'static str,
    kind: BindingKind,
    control: ControlId,
    generic: GenericInputBinding,
) -> InputBindingInfo {
    InputBindingInfo {
        name,
        display_name,
        kind,
        control,
        generic,
    }
}

static MASCON_BINDINGS: [InputBindingInfo; 12] = [
    binding("Power", "Power", BindingKind::Axis, ControlId::Power, GenericInputBinding::LeftStickDown),
    binding("Brake", "Brake", BindingKind::Axis, ControlId::Brake, GenericInputBinding::LeftStickUp),
    binding("Up", "D-Pad Up", BindingKind::Button, ControlId::Up, GenericInputBinding::DPadUp),
    binding("Down", "D-Pad Down", BindingKind::Button, ControlId::Down, GenericInputBinding::DPadDown),
    binding("Left", "D-Pad Left", BindingKind::Button, ControlId::Left, GenericInputBinding::DPadLeft),
    binding("Right", "D-Pad Right", BindingKind::Button, ControlId::Right, GenericInputBinding::DPadRight),
    binding("A", "A Button", BindingKind::Button, ControlId::A, GenericInputBinding::Square),
    binding("B", "B Button", BindingKind::Button, ControlId::B, GenericInputBinding::Cross),
    binding("C", "C Button", BindingKind::Button, ControlId::C, GenericInputBinding::Circle),
    binding("D", "D Button", BindingKind::Button, ControlId::D, GenericInputBinding::Triangle),
    binding("Select", "Select", BindingKind::Button, ControlId::Select, GenericInputBinding::Select),
    binding("Start", "Start", BindingKind::Button, ControlId::Start, GenericInputBinding::Start),
];

/// Bindings exposed for `variant`. Models that cannot be created expose none.
pub fn binding_info(variant: MasconVariant) -> &'static [InputBindingInfo] {
    match variant {
        MasconVariant::Type2 | MasconVariant::Shinkansen => &MASCON_BINDINGS,
        MasconVariant::Ryojouhen => &[],
    }
}

/// Normalized value to a byte, rounding half away from zero.
fn to_byte(value: f32) -> u8 {
    // NaN saturates to 0 in the cast.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

impl MasconState {
    /// Current value of a binding. Unknown indices read as 0.0.
    pub fn get_bind_value(&self, bind_index: u32) -> f32 {
        let Some(control) = ControlId::from_index(bind_index) else {
            return 0.0;
        };

        let data = &self.data;
        match control {
            ControlId::Power => f32::from(data.power) / 255.0,
            ControlId::Brake => f32::from(data.brake) / 255.0,
            ControlId::Up => flag(data.dpad.up != 0),
            ControlId::Right => flag(data.dpad.right != 0),
            ControlId::Down => flag(data.dpad.down != 0),
            ControlId::Left => flag(data.dpad.left != 0),
            ControlId::A
            | ControlId::B
            | ControlId::C
            | ControlId::D
            | ControlId::Select
            | ControlId::Start => {
                let mask = control.button_mask().unwrap_or(0);
                flag(data.buttons & mask != 0)
            }
        }
    }

    /// Drive a binding. Unknown indices are ignored.
    pub fn set_bind_value(&mut self, bind_index: u32, value: f32) {
        let Some(control) = ControlId::from_index(bind_index) else {
            return;
        };

        match control {
            ControlId::Power => self.data.power = to_byte(value),
            ControlId::Brake => self.data.brake = to_byte(value),
            ControlId::Up => {
                self.data.dpad.up = to_byte(value);
                self.update_hat_switch();
            }
            ControlId::Right => {
                self.data.dpad.right = to_byte(value);
                self.update_hat_switch();
            }
            ControlId::Down => {
                self.data.dpad.down = to_byte(value);
                self.update_hat_switch();
            }
            ControlId::Left => {
                self.data.dpad.left = to_byte(value);
                self.update_hat_switch();
            }
            ControlId::A
            | ControlId::B
            | ControlId::C
            | ControlId::D
            | ControlId::Select
            | ControlId::Start => {
                let mask = control.button_mask().unwrap_or(0);
                if value >= 0.5 {
                    self.data.buttons |= mask;
                } else {
                    self.data.buttons &= !mask;
                }
            }
        }
    }
}
