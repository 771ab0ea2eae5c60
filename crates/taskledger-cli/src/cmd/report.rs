use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use taskledger_core::classify::{Classification, classify};
use taskledger_core::dates::range_label;
use taskledger_core::report::{SectionLabels, render_html, render_text};
use taskledger_core::ticket::{TicketInfo, extract_ticket_id, load_summaries};

use super::{CommandContext, DateRangeArgs, load_selection};
use crate::output::render;
use crate::platform::{copy_html, open_in_browser};
use crate::tracker::{TicketTracker, TrackerClient, fetch_summaries};

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub range: DateRangeArgs,

    /// Copy an HTML version of the report to the clipboard.
    #[arg(long)]
    pub copy_html: bool,

    /// Save an HTML version of the report to this file.
    #[arg(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// Print the HTML version after the text report.
    #[arg(long)]
    pub show_html: bool,

    /// Open the saved HTML file in the default browser (needs --html-file).
    #[arg(long)]
    pub open_html: bool,

    /// JSON file of pre-fetched ticket summaries keyed by ticket ID.
    #[arg(long, value_name = "PATH")]
    pub jira_summaries: Option<PathBuf>,
}

impl ReportArgs {
    const fn wants_html(&self) -> bool {
        self.copy_html || self.html_file.is_some() || self.show_html || self.open_html
    }
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    range: String,
    dates: &'a [String],
    #[serde(flatten)]
    classification: &'a Classification,
}

fn write_text_report(
    out: &mut dyn Write,
    label: &str,
    result: &Classification,
    labels: &SectionLabels,
) -> io::Result<()> {
    writeln!(out, "Work Report ({label})")?;
    writeln!(out, "=======Autogenerated by TaskLedger=======")?;
    write!(out, "{}", render_text(result, labels))
}

/// Every distinct ticket ID the report links to.
fn referenced_ticket_ids(result: &Classification) -> Vec<String> {
    result
        .completed
        .keys()
        .chain(result.next_up.keys())
        .map(String::as_str)
        .chain(result.blocked.iter().map(|t| t.work_item_key.as_str()))
        .filter_map(extract_ticket_id)
        .collect()
}

fn resolve_summaries(
    args: &ReportArgs,
    ctx: &CommandContext,
    result: &Classification,
) -> Result<BTreeMap<String, TicketInfo>> {
    let base_url = &ctx.config.jira.base_url;
    if let Some(path) = &args.jira_summaries {
        return Ok(load_summaries(path, base_url)?);
    }

    let client = TrackerClient::from_config(&ctx.config.jira);
    if client.is_none() {
        tracing::debug!(
            token_env = %ctx.config.jira.token_env,
            "no tracker token set, rendering bare ticket links"
        );
    }
    Ok(fetch_summaries(
        client.as_ref().map(|c| c as &dyn TicketTracker),
        referenced_ticket_ids(result),
        base_url,
    ))
}

/// Save, show, copy or open the HTML report as requested.
///
/// Only a failed save is fatal; clipboard and browser problems are reported
/// inline so the text report still stands.
fn deliver_html(out: &mut dyn Write, args: &ReportArgs, html: &str) -> Result<()> {
    if let Some(path) = &args.html_file {
        std::fs::write(path, html)
            .with_context(|| format!("Failed to save HTML report: {}", path.display()))?;
        writeln!(out, "\n✅ HTML report saved to: {}", path.display())?;

        if args.open_html {
            match open_in_browser(path) {
                Ok(()) => writeln!(out, "🌐 Opened HTML report in default browser")?,
                Err(err) => {
                    writeln!(out, "⚠️  Failed to open HTML file in browser: {err:#}")?;
                }
            }
        }
    } else if args.open_html {
        writeln!(
            out,
            "\n💡 To use --open-html, you must also specify --html-file"
        )?;
    }

    if args.show_html {
        writeln!(out, "\n=== HTML OUTPUT ===")?;
        writeln!(out, "{html}")?;
        writeln!(out, "=== END HTML OUTPUT ===")?;
    }

    if args.copy_html {
        match copy_html(html) {
            Ok(()) => writeln!(out, "\n✅ HTML report copied to clipboard!")?,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "clipboard copy failed");
                writeln!(out, "\n⚠️  Failed to copy to clipboard: {err:#}")?;
                writeln!(
                    out,
                    "💡 Try using --html-file to save to a file instead, or --show-html to display the HTML"
                )?;
            }
        }
    }
    Ok(())
}

/// Execute `taskledger report`.
///
/// # Errors
///
/// Returns an error if the work log cannot be loaded, the range is invalid,
/// the summaries file is unreadable, or the HTML file cannot be written.
pub fn run_report(args: &ReportArgs, ctx: &CommandContext) -> Result<()> {
    let selection = load_selection(ctx, &args.range)?;
    let result = classify(&selection.work_log, &selection.dates);
    let label = range_label(&selection.dates);

    if ctx.output.is_json() {
        let output = ReportOutput {
            range: label,
            dates: &selection.dates,
            classification: &result,
        };
        return render(ctx.output, &output, |_, _| Ok(()));
    }

    let labels = ctx.config.report.labels();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_text_report(&mut out, &label, &result, &labels)?;

    if args.wants_html() {
        let summaries = resolve_summaries(args, ctx, &result)?;
        let html = render_html(
            &result,
            &label,
            &summaries,
            &labels,
            &ctx.config.jira.base_url,
        );
        deliver_html(&mut out, args, &html)?;
    }
    Ok(())
}
