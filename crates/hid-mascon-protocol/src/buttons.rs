//! Canonical button mask to per-model wire byte.

use crate::types::{MasconVariant, button_bits};

/// A and B share the wire bits above C/D on the Shinkansen layout.
fn ab(buttons: u8) -> u8 {
    (buttons & button_bits::A) | (buttons & button_bits::B)
}

/// C and D swapped in place.
fn cd_swapped(buttons: u8) -> u8 {
    ((buttons & button_bits::C) << 1) | ((buttons & button_bits::D) >> 1)
}

fn start_select(buttons: u8) -> u8 {
    (buttons & button_bits::START) | (buttons & button_bits::SELECT)
}

/// Type 2 sends its buttons in binding order.
pub fn type2_buttons(buttons: u8) -> u8 {
    buttons
}

/// Shinkansen and Ryojouhen layout: D, C, B, A, Select, Start from bit 0 up.
pub fn shinkansen_buttons(buttons: u8) -> u8 {
    (ab(buttons) << 2) | (cd_swapped(buttons) >> 2) | start_select(buttons)
}

/// Remap a canonical button mask into the model's button byte.
pub fn remap_buttons(variant: MasconVariant, buttons: u8) -> u8 {
    match variant {
        MasconVariant::Type2 => type2_buttons(buttons),
        MasconVariant::Shinkansen | MasconVariant::Ryojouhen => shinkansen_buttons(buttons),
    }
}
