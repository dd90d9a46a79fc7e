//! Report encoding command

use anyhow::Result;

use crate::commands::{Context, InputArgs, apply_inputs, poll_report};
use crate::output;

pub fn execute(ctx: &Context, input: &InputArgs) -> Result<()> {
    let variant = ctx.variant(input.variant);
    let mut device = ctx.create_device(variant)?;
    apply_inputs(&mut device, input)?;
    let report = poll_report(&mut device)?;
    output::print_report(variant, &device, &report, ctx.json);
    Ok(())
}
