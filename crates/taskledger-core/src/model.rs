//! Work log entities as they appear in the YAML ledger.
//!
//! The ledger is a map from ISO `YYYY-MM-DD` date strings to a [`DailyLog`].
//! Each day carries clock-in/clock-out pairs and the [`TaskRecord`]s logged
//! that day. Records are read once and never mutated.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The three statuses the classifier understands.
///
/// Records carry free-text status; anything that does not match one of these
/// (case-insensitively) simply never satisfies a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    InProgress,
    NotStarted,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Completed, Self::InProgress, Self::NotStarted];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in progress",
            Self::NotStarted => "not started",
        }
    }

    /// Case-insensitive match against a raw status string.
    #[must_use]
    pub fn matches(self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clock-in/clock-out pair, `HH:MM` each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: String,
}

/// A single task entry logged on some date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub descriptions: Vec<String>,
    /// Work-item key. Opaque: a ticket ID, a ticket URL, a free-form tag, or empty.
    #[serde(rename = "jira_ticket", default, deserialize_with = "null_as_default")]
    pub work_item_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_goal: Option<String>,
    #[serde(
        rename = "upnext_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upcoming_note: Option<String>,
    #[serde(rename = "github_pr", default, skip_serializing_if = "Option::is_none")]
    pub pr_link: Option<String>,
    #[serde(rename = "blocker", default, skip_serializing_if = "Option::is_none")]
    pub blocker_note: Option<String>,
}

impl TaskRecord {
    /// Whether the raw status matches `status`, ignoring case.
    #[must_use]
    pub fn has_status(&self, status: Status) -> bool {
        status.matches(&self.status)
    }

    /// `description` followed by `descriptions`, skipping empty strings.
    #[must_use]
    pub fn combined_descriptions(&self) -> Vec<&str> {
        self.description
            .as_deref()
            .into_iter()
            .chain(self.descriptions.iter().map(String::as_str))
            .filter(|d| !d.is_empty())
            .collect()
    }

    #[must_use]
    pub fn upcoming_note(&self) -> Option<&str> {
        non_empty(self.upcoming_note.as_deref())
    }

    #[must_use]
    pub fn pr_link(&self) -> Option<&str> {
        non_empty(self.pr_link.as_deref())
    }

    #[must_use]
    pub fn blocker_note(&self) -> Option<&str> {
        non_empty(self.blocker_note.as_deref())
    }
}

/// Everything logged for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    #[serde(rename = "work_log", default, deserialize_with = "null_as_default")]
    pub entries: Vec<WorkLogEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskRecord>,
}

/// The whole ledger, keyed by `YYYY-MM-DD`.
///
/// ISO date strings order lexicographically the same as chronologically, so
/// the map iterates oldest first.
pub type WorkLog = BTreeMap<String, DailyLog>;

/// A task paired with the date it was logged on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedTaskRecord {
    pub date: String,
    #[serde(flatten)]
    pub task: TaskRecord,
}

impl DatedTaskRecord {
    #[must_use]
    pub fn new(date: impl Into<String>, task: TaskRecord) -> Self {
        Self {
            date: date.into(),
            task,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Treat an explicit YAML `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
