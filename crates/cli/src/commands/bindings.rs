//! Binding table command

use anyhow::Result;
use densha_usb_mascon::{DeviceProxy, MasconDevice, MasconVariant};

use crate::commands::Context;
use crate::output;

pub fn execute(ctx: &Context, variant: Option<MasconVariant>) -> Result<()> {
    let variant = ctx.variant(variant);
    let proxy = MasconDevice;
    output::print_bindings(variant, proxy.bindings(variant.subtype()), ctx.json);
    Ok(())
}
