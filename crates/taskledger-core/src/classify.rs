//! Task classification: completed work, next-up plans, and current blockers.
//!
//! A work item is every record sharing a work-item key across the selected
//! dates. Its *most recent* record (greatest date, later list position on a
//! tie) is the only source of truth for whether the item is still open and
//! whether it is currently blocked. Earlier records still contribute
//! descriptions and PR links to the completed view.
//!
//! Records with an empty key are pooled into a single anonymous item for
//! most-recent purposes, so unrelated untracked tasks can supersede each
//! other's blocker or next-up visibility. This mirrors how the ledger has
//! always behaved and is covered by tests; see `DESIGN.md`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{DatedTaskRecord, Status, TaskRecord, WorkLog};
use crate::ticket::extract_ticket_id;

/// Marker for work deliberately logged without a ticket.
pub const NO_TICKET_MARKER: &str = "NO-JIRA";

/// Key used for most-recent tracking.
///
/// Empty work-item keys collapse into [`TrackingKey::Anonymous`], which can
/// never collide with a real key. Named keys sort before the anonymous pool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TrackingKey {
    Named(String),
    Anonymous,
}

impl TrackingKey {
    #[must_use]
    pub fn from_work_item_key(key: &str) -> Self {
        if key.is_empty() {
            Self::Anonymous
        } else {
            Self::Named(key.to_string())
        }
    }
}

/// Per-key buckets for one report.
///
/// `completed` and `next_up` map the raw work-item key to its records in date
/// order; `blocked` holds the most recent record of every currently blocked
/// item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub completed: BTreeMap<String, Vec<DatedTaskRecord>>,
    pub next_up: BTreeMap<String, Vec<DatedTaskRecord>>,
    pub blocked: Vec<TaskRecord>,
}

impl Classification {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.next_up.is_empty() && self.blocked.is_empty()
    }
}

/// Whether a record counts toward the completed view.
///
/// In-progress work that produced documented output counts too.
#[must_use]
pub fn counts_as_completed(task: &TaskRecord) -> bool {
    task.has_status(Status::Completed)
        || (task.has_status(Status::InProgress) && !task.combined_descriptions().is_empty())
}

/// Whether an item whose latest record is `task` is still open.
#[must_use]
pub fn is_open(task: &TaskRecord) -> bool {
    task.has_status(Status::InProgress) || task.has_status(Status::NotStarted)
}

fn track_latest(
    latest: &mut BTreeMap<TrackingKey, DatedTaskRecord>,
    dated: &DatedTaskRecord,
) {
    let key = TrackingKey::from_work_item_key(&dated.task.work_item_key);
    match latest.get(&key) {
        Some(existing) if existing.date > dated.date => {}
        _ => {
            latest.insert(key, dated.clone());
        }
    }
}

fn dated_records<'a>(
    work_log: &'a WorkLog,
    ordered_dates: &'a [String],
) -> impl Iterator<Item = DatedTaskRecord> + 'a {
    ordered_dates
        .iter()
        .filter_map(|date| work_log.get(date).map(|day| (date, day)))
        .flat_map(|(date, day)| {
            day.tasks
                .iter()
                .map(move |task| DatedTaskRecord::new(date.clone(), task.clone()))
        })
}

/// The most recent record per tracking key over `ordered_dates`.
///
/// Dates missing from `work_log` are skipped.
#[must_use]
pub fn latest_by_key(
    work_log: &WorkLog,
    ordered_dates: &[String],
) -> BTreeMap<TrackingKey, DatedTaskRecord> {
    let mut latest = BTreeMap::new();
    for dated in dated_records(work_log, ordered_dates) {
        track_latest(&mut latest, &dated);
    }
    latest
}

/// Bucket every record logged on `ordered_dates` into completed, next-up,
/// and blocked views.
///
/// `ordered_dates` must be ascending and free of duplicates; the classifier
/// does not re-sort. Dates absent from `work_log` are skipped silently.
#[must_use]
pub fn classify(work_log: &WorkLog, ordered_dates: &[String]) -> Classification {
    let mut completed: BTreeMap<String, Vec<DatedTaskRecord>> = BTreeMap::new();
    let mut candidates: BTreeMap<String, Vec<DatedTaskRecord>> = BTreeMap::new();
    let mut latest: BTreeMap<TrackingKey, DatedTaskRecord> = BTreeMap::new();

    for dated in dated_records(work_log, ordered_dates) {
        let key = &dated.task.work_item_key;

        if counts_as_completed(&dated.task) {
            completed
                .entry(key.clone())
                .or_default()
                .push(dated.clone());
        }

        if dated.task.upcoming_note().is_some() {
            candidates
                .entry(key.clone())
                .or_default()
                .push(dated.clone());
        }

        track_latest(&mut latest, &dated);
    }

    let next_up: BTreeMap<String, Vec<DatedTaskRecord>> = candidates
        .into_iter()
        .filter(|(key, _)| {
            latest
                .get(&TrackingKey::from_work_item_key(key))
                .is_some_and(|recent| is_open(&recent.task))
        })
        .collect();

    let blocked: Vec<TaskRecord> = latest
        .into_values()
        .filter(|recent| recent.task.blocker_note().is_some())
        .map(|recent| recent.task)
        .collect();

    tracing::debug!(
        dates = ordered_dates.len(),
        completed = completed.len(),
        next_up = next_up.len(),
        blocked = blocked.len(),
        "classified work log"
    );

    Classification {
        completed,
        next_up,
        blocked,
    }
}

/// Whether an item belongs in the trailing "Non-feature work" group.
///
/// - an empty key is non-feature work;
/// - a key marked `NO-JIRA` is non-feature work unless it has a PR;
/// - any other key is non-feature work when no ticket ID can be extracted.
#[must_use]
pub fn is_non_feature_work(key: &str, has_pr: bool) -> bool {
    if key.is_empty() {
        return true;
    }
    if key.to_uppercase().contains(NO_TICKET_MARKER) {
        return !has_pr;
    }
    extract_ticket_id(key).is_none()
}

/// Whether any record of a grouped item carries a PR link.
#[must_use]
pub fn group_has_pr(records: &[DatedTaskRecord]) -> bool {
    records.iter().any(|r| r.task.pr_link().is_some())
}

/// Split a keyed bucket into feature and non-feature keys, each ascending.
#[must_use]
pub fn split_feature_keys(
    bucket: &BTreeMap<String, Vec<DatedTaskRecord>>,
) -> (Vec<&str>, Vec<&str>) {
    bucket
        .iter()
        .map(|(key, records)| (key.as_str(), is_non_feature_work(key, group_has_pr(records))))
        .fold((Vec::new(), Vec::new()), |(mut feature, mut misc), (key, non_feature)| {
            if non_feature {
                misc.push(key);
            } else {
                feature.push(key);
            }
            (feature, misc)
        })
}

/// Split blocked entries into feature and non-feature groups, each sorted by
/// key (stable for equal keys).
#[must_use]
pub fn split_blocked(blocked: &[TaskRecord]) -> (Vec<&TaskRecord>, Vec<&TaskRecord>) {
    let (mut feature, mut misc): (Vec<&TaskRecord>, Vec<&TaskRecord>) = blocked
        .iter()
        .partition(|task| !is_non_feature_work(&task.work_item_key, task.pr_link().is_some()));
    feature.sort_by(|a, b| a.work_item_key.cmp(&b.work_item_key));
    misc.sort_by(|a, b| a.work_item_key.cmp(&b.work_item_key));
    (feature, misc)
}
