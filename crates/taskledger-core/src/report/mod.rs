//! Report rendering over a [`Classification`](crate::classify::Classification).
//!
//! Renderers share the same grouping, ordering and per-item content rules.
//! Only the markup differs:
//!
//! - [`text`]: indented bullets for pasting into chat.
//! - [`html`]: a minimal nested-list document.
//! - [`comment`]: one tracker comment per ticket.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::DatedTaskRecord;

pub mod comment;
pub mod html;
pub mod text;

pub use comment::{TicketComment, build_ticket_comments};
pub use html::{escape_html, render_html};
pub use text::render_text;

/// Heading for the trailing group of untracked items.
pub const NON_FEATURE_HEADING: &str = "Non-feature work";

/// Sub-heading used for items with an empty key.
pub const MISC_LABEL: &str = "Misc";

/// Section titles shown after each section's emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub completed: String,
    pub next_up: String,
    pub blocked: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            completed: "Thing I've been working on".to_string(),
            next_up: "Thing I plan on working on next".to_string(),
            blocked: "Thing that is blocking me or that I could use some help / discussion about"
                .to_string(),
        }
    }
}

/// Label for a non-feature sub-block.
#[must_use]
pub const fn sub_block_label(key: &str) -> &str {
    if key.is_empty() { MISC_LABEL } else { key }
}

/// Combined descriptions of every record, in record order.
#[must_use]
pub fn completed_descriptions(records: &[DatedTaskRecord]) -> Vec<&str> {
    records
        .iter()
        .flat_map(|r| r.task.combined_descriptions())
        .collect()
}

/// De-duplicated PR links across `records`, ascending.
#[must_use]
pub fn pr_links(records: &[DatedTaskRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.task.pr_link())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The latest next-up note for a key.
///
/// Walks from the newest record back and takes the first record that yields
/// either an upcoming note or, failing that, its last description.
#[must_use]
pub fn latest_note(records: &[DatedTaskRecord]) -> Option<&str> {
    records.iter().rev().find_map(|r| {
        r.task
            .upcoming_note()
            .or_else(|| r.task.combined_descriptions().last().copied())
    })
}

/// `a; b; c`
#[must_use]
pub fn join_prs(links: &[&str]) -> String {
    links.join("; ")
}
