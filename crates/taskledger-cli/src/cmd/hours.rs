use anyhow::Result;
use clap::Args;
use taskledger_core::hours::compute_hours;

use super::{CommandContext, DateRangeArgs, load_selection};
use crate::output::render;

#[derive(Args, Debug)]
pub struct HoursArgs {
    #[command(flatten)]
    pub range: DateRangeArgs,
}

/// Execute `taskledger hours`.
///
/// # Errors
///
/// Returns an error if the work log cannot be loaded or the range is invalid.
pub fn run_hours(args: &HoursArgs, ctx: &CommandContext) -> Result<()> {
    let selection = load_selection(ctx, &args.range)?;
    let summary = compute_hours(&selection.work_log, &selection.dates);
    if summary.skipped_entries > 0 {
        tracing::info!(
            skipped = summary.skipped_entries,
            "some time entries were not counted"
        );
    }
    render(ctx.output, &summary, |s, w| writeln!(w, "{}", s.line()))
}
