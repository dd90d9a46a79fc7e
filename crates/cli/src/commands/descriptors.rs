//! Descriptor dump command

use anyhow::Result;
use densha_hid_mascon_protocol::{ConfigDescriptor, DescriptorSet, DeviceDescriptor};
use densha_usb_mascon::MasconVariant;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

pub fn execute(ctx: &Context, variant: Option<MasconVariant>) -> Result<()> {
    let variant = ctx.variant(variant);
    let set = DescriptorSet::for_variant(variant);

    // Not every model can be created as a device; parse the tables directly.
    let device = DeviceDescriptor::parse(set.device).map_err(CliError::from)?;
    let config = ConfigDescriptor::parse(set.config).map_err(CliError::from)?;

    output::print_descriptors(&set, &device, &config, ctx.json);
    Ok(())
}
