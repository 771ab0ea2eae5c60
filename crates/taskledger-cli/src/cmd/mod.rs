pub mod comment;
pub mod completions;
pub mod hours;
pub mod init;
pub mod report;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use taskledger_core::config::LedgerConfig;
use taskledger_core::dates::select_dates;
use taskledger_core::model::WorkLog;
use taskledger_core::worklog::load_work_log;

use crate::output::OutputMode;

/// Resolved settings every command runs with.
pub struct CommandContext {
    pub worklog_path: PathBuf,
    pub config: LedgerConfig,
    pub output: OutputMode,
}

/// `--start-date` / `--end-date`, shared by the reporting commands.
#[derive(Args, Debug, Clone, Default)]
pub struct DateRangeArgs {
    /// First day to include (YYYY-MM-DD). Alone, selects just that day.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<String>,

    /// Last day to include (YYYY-MM-DD). Alone, selects just that day.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end_date: Option<String>,
}

/// The work log plus the ascending dates a command should look at.
pub struct Selection {
    pub work_log: WorkLog,
    pub dates: Vec<String>,
}

/// Load the work log and resolve the requested date range against it.
///
/// # Errors
///
/// Propagates load, parse and date-selection failures.
pub fn load_selection(ctx: &CommandContext, range: &DateRangeArgs) -> Result<Selection> {
    let work_log = load_work_log(&ctx.worklog_path)?;
    let dates = select_dates(
        &work_log,
        range.start_date.as_deref(),
        range.end_date.as_deref(),
    )?;
    Ok(Selection { work_log, dates })
}
