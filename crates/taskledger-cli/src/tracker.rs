//! Blocking client for the ticket tracker's REST API.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use taskledger_core::config::JiraConfig;
use taskledger_core::ticket::TicketInfo;
use tracing::{debug, warn};

const COMMENT_PAGE_SIZE: usize = 100;

/// The tracker operations commands depend on.
pub trait TicketTracker {
    /// Human-readable summary of a ticket.
    fn fetch_summary(&self, ticket_id: &str) -> Result<String>;
    /// Bodies of every existing comment on a ticket.
    fn comment_bodies(&self, ticket_id: &str) -> Result<Vec<String>>;
    fn add_comment(&self, ticket_id: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct CommentPage {
    #[serde(default)]
    comments: Vec<CommentEntry>,
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Deserialize)]
struct CommentEntry {
    #[serde(default)]
    body: String,
}

pub struct TrackerClient {
    base_url: String,
    token: String,
    agent: ureq::Agent,
}

impl TrackerClient {
    pub fn new(config: &JiraConfig, token: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    /// A client when a token is configured, otherwise `None`.
    pub fn from_config(config: &JiraConfig) -> Option<Self> {
        config.resolve_token().map(|token| Self::new(config, token))
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .authorize(self.agent.get(url))
            .call()
            .map_err(|err| anyhow::anyhow!("tracker API request failed for {url}: {err}"))?;

        response
            .into_json::<T>()
            .context("failed to decode tracker API JSON response")
    }
}

fn issue_url(base: &str, ticket_id: &str) -> String {
    format!("{base}/rest/api/2/issue/{ticket_id}?fields=summary")
}

fn comments_url(base: &str, ticket_id: &str) -> String {
    format!("{base}/rest/api/2/issue/{ticket_id}/comment")
}

fn paged_comments_url(base: &str, ticket_id: &str, start_at: usize) -> String {
    format!(
        "{}?startAt={start_at}&maxResults={COMMENT_PAGE_SIZE}",
        comments_url(base, ticket_id)
    )
}

impl TicketTracker for TrackerClient {
    fn fetch_summary(&self, ticket_id: &str) -> Result<String> {
        let issue: IssueResponse = self
            .get_json(&issue_url(&self.base_url, ticket_id))
            .with_context(|| format!("failed to fetch summary for {ticket_id}"))?;
        Ok(issue.fields.summary)
    }

    fn comment_bodies(&self, ticket_id: &str) -> Result<Vec<String>> {
        let mut bodies = Vec::new();
        loop {
            let url = paged_comments_url(&self.base_url, ticket_id, bodies.len());
            let page: CommentPage = self
                .get_json(&url)
                .with_context(|| format!("failed to list comments for {ticket_id}"))?;

            let fetched = page.comments.len();
            bodies.extend(page.comments.into_iter().map(|c| c.body));

            if fetched == 0 || bodies.len() >= page.total {
                break;
            }
        }
        debug!(ticket = ticket_id, count = bodies.len(), "listed tracker comments");
        Ok(bodies)
    }

    fn add_comment(&self, ticket_id: &str, body: &str) -> Result<()> {
        let url = comments_url(&self.base_url, ticket_id);
        self.authorize(self.agent.post(&url))
            .send_json(serde_json::json!({ "body": body }))
            .map_err(|err| anyhow::anyhow!("tracker API request failed for {url}: {err}"))?;
        Ok(())
    }
}

/// Resolve summaries for `ticket_ids`, degrading to bare links.
///
/// Without a tracker every ticket gets a bare entry. A failed fetch is
/// logged and also yields a bare entry.
pub fn fetch_summaries<I>(
    tracker: Option<&dyn TicketTracker>,
    ticket_ids: I,
    base_url: &str,
) -> BTreeMap<String, TicketInfo>
where
    I: IntoIterator<Item = String>,
{
    let mut infos = BTreeMap::new();
    for id in ticket_ids {
        if infos.contains_key(&id) {
            continue;
        }
        let mut info = TicketInfo::bare(&id, base_url);
        if let Some(tracker) = tracker {
            match tracker.fetch_summary(&id) {
                Ok(summary) => info.summary = summary,
                Err(err) => {
                    warn!(ticket = %id, error = %format!("{err:#}"), "failed to fetch ticket summary");
                }
            }
        }
        infos.insert(id, info);
    }
    infos
}

#[cfg(test)]
pub mod fake {
    use super::TicketTracker;
    use anyhow::{Result, bail};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory tracker for command tests.
    #[derive(Default)]
    pub struct FakeTracker {
        pub summaries: BTreeMap<String, String>,
        pub comments: RefCell<BTreeMap<String, Vec<String>>>,
        pub fail_posts: bool,
    }

    impl TicketTracker for FakeTracker {
        fn fetch_summary(&self, ticket_id: &str) -> Result<String> {
            match self.summaries.get(ticket_id) {
                Some(summary) => Ok(summary.clone()),
                None => bail!("404 for {ticket_id}"),
            }
        }

        fn comment_bodies(&self, ticket_id: &str) -> Result<Vec<String>> {
            Ok(self
                .comments
                .borrow()
                .get(ticket_id)
                .cloned()
                .unwrap_or_default())
        }

        fn add_comment(&self, ticket_id: &str, body: &str) -> Result<()> {
            if self.fail_posts {
                bail!("post rejected for {ticket_id}");
            }
            self.comments
                .borrow_mut()
                .entry(ticket_id.to_string())
                .or_default()
                .push(body.to_string());
            Ok(())
        }
    }
}
