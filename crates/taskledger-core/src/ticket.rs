//! Ticket identifiers and tracker metadata.
//!
//! Work-item keys are free text. This module recognizes a canonical tracker
//! ID (`PROJ-123`) inside them and defines the [`SummaryLookup`] seam the HTML
//! renderer uses to turn IDs into titled links.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::LedgerError;

/// Tracker instance used when no base URL is configured.
pub const DEFAULT_TRACKER_BASE_URL: &str = "https://issues.redhat.com";

fn browse_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://[^\s/]+(?:/[^\s/]+)*?/browse/([A-Z]+-[0-9]+)")
            .expect("browse url regex must compile")
    })
}

fn bare_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z]+-[0-9]+)\b").expect("ticket id regex must compile"))
}

/// Pull a canonical ticket ID out of a URL or free-form text.
///
/// A `…/browse/<ID>` URL wins over any bare ID elsewhere in the text.
/// Returns `None` when nothing matches; never panics.
#[must_use]
pub fn extract_ticket_id(input: &str) -> Option<String> {
    browse_url_re()
        .captures(input)
        .or_else(|| bare_id_re().captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `<base>/browse/<id>`, tolerating a trailing slash on `base`.
#[must_use]
pub fn browse_url(base: &str, ticket_id: &str) -> String {
    format!("{}/browse/{ticket_id}", base.trim_end_matches('/'))
}

/// Resolved tracker metadata for one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInfo {
    #[serde(default, alias = "Key")]
    pub key: String,
    #[serde(default, alias = "Summary")]
    pub summary: String,
    #[serde(default, alias = "URL")]
    pub url: String,
}

impl TicketInfo {
    /// Info carrying only the ID and its browse link.
    #[must_use]
    pub fn bare(ticket_id: &str, base_url: &str) -> Self {
        Self {
            key: ticket_id.to_string(),
            summary: String::new(),
            url: browse_url(base_url, ticket_id),
        }
    }
}

/// Resolves a canonical ticket ID to a human-readable title.
///
/// Absence is a normal outcome; implementations must not fail.
pub trait SummaryLookup {
    fn summary(&self, ticket_id: &str) -> Option<String>;
}

/// A lookup that knows nothing; every ticket renders as a bare link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSummaries;

impl SummaryLookup for NoSummaries {
    fn summary(&self, _ticket_id: &str) -> Option<String> {
        None
    }
}

impl SummaryLookup for BTreeMap<String, TicketInfo> {
    fn summary(&self, ticket_id: &str) -> Option<String> {
        self.get(ticket_id)
            .map(|info| info.summary.clone())
            .filter(|s| !s.is_empty())
    }
}

impl SummaryLookup for HashMap<String, String> {
    fn summary(&self, ticket_id: &str) -> Option<String> {
        self.get(ticket_id).cloned().filter(|s| !s.is_empty())
    }
}

impl<F> SummaryLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn summary(&self, ticket_id: &str) -> Option<String> {
        self(ticket_id).filter(|s| !s.is_empty())
    }
}

/// Load pre-fetched summaries from a JSON object keyed by ticket ID.
///
/// Missing `key` or `url` fields are filled in from the map key and
/// `base_url`.
///
/// # Errors
///
/// Returns [`LedgerError::SummariesRead`] or [`LedgerError::SummariesParse`]
/// when the file cannot be read or is not a JSON object of ticket entries.
pub fn load_summaries(
    path: &Path,
    base_url: &str,
) -> Result<BTreeMap<String, TicketInfo>, LedgerError> {
    let content = std::fs::read_to_string(path).map_err(|source| LedgerError::SummariesRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut summaries: BTreeMap<String, TicketInfo> =
        serde_json::from_str(&content).map_err(|source| LedgerError::SummariesParse {
            path: path.to_path_buf(),
            source,
        })?;

    for (id, info) in &mut summaries {
        if info.key.is_empty() {
            info.key.clone_from(id);
        }
        if info.url.is_empty() {
            info.url = browse_url(base_url, &info.key);
        }
    }

    tracing::debug!(count = summaries.len(), path = %path.display(), "loaded ticket summaries");
    Ok(summaries)
}
