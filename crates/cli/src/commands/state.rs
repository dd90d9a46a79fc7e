//! Save-state commands

use std::path::Path;

use anyhow::Result;
use densha_usb_mascon::{MasconVariant, SaveState};
use tracing::info;

use crate::commands::{Context, InputArgs, apply_inputs, poll_report};
use crate::error::CliError;
use crate::output;

pub fn save(ctx: &Context, input: &InputArgs, out: &Path) -> Result<()> {
    let variant = ctx.variant(input.variant);
    let mut device = ctx.create_device(variant)?;
    apply_inputs(&mut device, input)?;

    let blob = device.save_state().map_err(CliError::from)?;
    std::fs::write(out, &blob).map_err(CliError::from)?;
    info!("Wrote {} byte save state to {}", blob.len(), out.display());

    output::print_saved(out, &device, blob.len(), ctx.json);
    Ok(())
}

pub fn load(ctx: &Context, variant: Option<MasconVariant>, file: &Path) -> Result<()> {
    let variant = ctx.variant(variant);
    let blob = std::fs::read(file).map_err(CliError::from)?;

    let mut device = ctx.create_device(variant)?;
    device.load_state(&blob).map_err(CliError::from)?;
    let report = poll_report(&mut device)?;

    output::print_report(variant, &device, &report, ctx.json);
    Ok(())
}
