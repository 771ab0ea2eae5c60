use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use taskledger_core::classify::classify;
use taskledger_core::dates::range_label;
use taskledger_core::report::{TicketComment, build_ticket_comments};
use taskledger_core::ticket::extract_ticket_id;

use super::{CommandContext, DateRangeArgs, load_selection};
use crate::output::render;
use crate::tracker::{TicketTracker, TrackerClient};

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub range: DateRangeArgs,

    /// Only comment on this ticket (ID or browse URL).
    #[arg(long, value_name = "ID")]
    pub ticket: Option<String>,

    /// Print the comments instead of posting them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct FailedComment {
    pub ticket_id: String,
    pub error: String,
}

/// What happened to each generated comment.
#[derive(Debug, Default, Serialize)]
pub struct PublishReport {
    pub posted: Vec<String>,
    /// Tickets that already carry an identical comment.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedComment>,
}

/// Post every comment whose body is not already on its ticket.
///
/// A failure on one ticket is recorded and does not stop the others.
#[must_use]
pub fn publish_comments(tracker: &dyn TicketTracker, comments: &[TicketComment]) -> PublishReport {
    let mut report = PublishReport::default();
    for comment in comments {
        let ticket_id = comment.ticket_id.clone();
        let outcome = tracker.comment_bodies(&ticket_id).and_then(|existing| {
            if existing.iter().any(|body| body.trim() == comment.body.trim()) {
                return Ok(false);
            }
            tracker.add_comment(&ticket_id, &comment.body).map(|()| true)
        });

        match outcome {
            Ok(true) => {
                tracing::info!(ticket = %ticket_id, "posted comment");
                report.posted.push(ticket_id);
            }
            Ok(false) => {
                tracing::debug!(ticket = %ticket_id, "identical comment already present");
                report.skipped.push(ticket_id);
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(ticket = %ticket_id, error = %error, "failed to post comment");
                report.failed.push(FailedComment { ticket_id, error });
            }
        }
    }
    report
}

fn filter_ticket(comments: Vec<TicketComment>, ticket: Option<&str>) -> Vec<TicketComment> {
    let Some(wanted) = ticket else {
        return comments;
    };
    let wanted = extract_ticket_id(wanted).unwrap_or_else(|| wanted.to_string());
    comments
        .into_iter()
        .filter(|c| c.ticket_id == wanted)
        .collect()
}

fn write_preview(comments: &[TicketComment], w: &mut dyn Write) -> std::io::Result<()> {
    if comments.is_empty() {
        return writeln!(w, "No ticket updates in the selected range.");
    }
    for comment in comments {
        writeln!(w, "=== {} ===", comment.ticket_id)?;
        writeln!(w, "{}", comment.body)?;
        writeln!(w)?;
    }
    Ok(())
}

fn write_publish_report(report: &PublishReport, w: &mut dyn Write) -> std::io::Result<()> {
    for id in &report.posted {
        writeln!(w, "✅ Commented on {id}")?;
    }
    for id in &report.skipped {
        writeln!(w, "⏭️  {id} already has this update")?;
    }
    for failed in &report.failed {
        writeln!(w, "⚠️  {}: {}", failed.ticket_id, failed.error)?;
    }
    Ok(())
}

/// Execute `taskledger comment`.
///
/// # Errors
///
/// Returns an error if the work log or range is invalid, if no tracker
/// token is configured outside `--dry-run`, or if any comment failed to post.
pub fn run_comment(args: &CommentArgs, ctx: &CommandContext) -> Result<()> {
    let selection = load_selection(ctx, &args.range)?;
    let result = classify(&selection.work_log, &selection.dates);
    let label = range_label(&selection.dates);
    let comments = filter_ticket(
        build_ticket_comments(&result, &label),
        args.ticket.as_deref(),
    );

    if args.dry_run {
        return render(ctx.output, &comments, |c, w| write_preview(c, w));
    }

    let Some(client) = TrackerClient::from_config(&ctx.config.jira) else {
        bail!(
            "no tracker token found in ${}. Export it, or use --dry-run to preview the comments.",
            ctx.config.jira.token_env
        );
    };

    let report = publish_comments(&client, &comments);
    render(ctx.output, &report, write_publish_report)?;
    if !report.failed.is_empty() {
        bail!("failed to post {} comment(s)", report.failed.len());
    }
    Ok(())
}
