//! Loading the YAML ledger and generating a starter ledger.

use chrono::{Duration, NaiveDate};
use std::path::Path;

use crate::error::LedgerError;
use crate::model::{DailyLog, Status, TaskRecord, WorkLog, WorkLogEntry};

/// Date format used for ledger keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read and parse a work log.
///
/// # Errors
///
/// Returns [`LedgerError::WorkLogRead`] if the file cannot be read, or
/// [`LedgerError::WorkLogParse`] if it is not a valid ledger.
pub fn load_work_log(path: &Path) -> Result<WorkLog, LedgerError> {
    let content = std::fs::read_to_string(path).map_err(|source| LedgerError::WorkLogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let log = parse_work_log(&content).map_err(|source| LedgerError::WorkLogParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(days = log.len(), path = %path.display(), "loaded work log");
    Ok(log)
}

/// Parse ledger YAML. An empty document is an empty ledger.
///
/// # Errors
///
/// Propagates the YAML parse error.
pub fn parse_work_log(content: &str) -> Result<WorkLog, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(WorkLog::new());
    }
    let parsed: Option<WorkLog> = serde_yaml::from_str(content)?;
    Ok(parsed.unwrap_or_default())
}

fn entry(start: &str, end: &str) -> WorkLogEntry {
    WorkLogEntry {
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

/// Starter ledger covering the day before `today` and `today`.
///
/// Every field and every status appears at least once, so the file doubles
/// as format documentation.
#[must_use]
pub fn initial_worklog(today: NaiveDate) -> WorkLog {
    let yesterday = today - Duration::days(1);

    let yesterday_log = DailyLog {
        entries: vec![entry("09:00", "12:00"), entry("13:00", "17:30")],
        tasks: vec![
            TaskRecord {
                status: Status::Completed.as_str().to_string(),
                description: Some("Set up local development environment".to_string()),
                work_item_key: "https://issues.redhat.com/browse/PROJ-101".to_string(),
                qc_goal: Some("Environment builds cleanly from scratch".to_string()),
                pr_link: Some("https://github.com/example/repo/pull/1".to_string()),
                ..TaskRecord::default()
            },
            TaskRecord {
                status: Status::InProgress.as_str().to_string(),
                descriptions: vec![
                    "Drafted API design".to_string(),
                    "Reviewed design with the team".to_string(),
                ],
                work_item_key: "PROJ-102".to_string(),
                upcoming_note: Some("Implement the first API endpoint".to_string()),
                ..TaskRecord::default()
            },
        ],
    };

    let today_log = DailyLog {
        entries: vec![entry("08:30", "12:00"), entry("12:45", "16:45")],
        tasks: vec![
            TaskRecord {
                status: Status::InProgress.as_str().to_string(),
                description: Some("Implemented the first API endpoint".to_string()),
                descriptions: vec!["Added unit tests for request validation".to_string()],
                work_item_key: "PROJ-102".to_string(),
                qc_goal: Some("Endpoint covered by tests".to_string()),
                upcoming_note: Some("Wire the endpoint into the gateway".to_string()),
                pr_link: Some("https://github.com/example/repo/pull/2".to_string()),
                blocker_note: Some("Waiting on gateway credentials".to_string()),
            },
            TaskRecord {
                status: Status::NotStarted.as_str().to_string(),
                description: Some("Update team onboarding notes".to_string()),
                work_item_key: String::new(),
                upcoming_note: Some("Review onboarding notes with new hires".to_string()),
                ..TaskRecord::default()
            },
        ],
    };

    let mut log = WorkLog::new();
    log.insert(yesterday.format(DATE_FORMAT).to_string(), yesterday_log);
    log.insert(today.format(DATE_FORMAT).to_string(), today_log);
    log
}

/// [`initial_worklog`] serialized as YAML.
///
/// # Errors
///
/// Returns [`LedgerError::TemplateSerialize`] if serialization fails.
pub fn initial_worklog_yaml(today: NaiveDate) -> Result<String, LedgerError> {
    serde_yaml::to_string(&initial_worklog(today)).map_err(LedgerError::TemplateSerialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 31).expect("valid date")
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_work_log(&dir.path().join("absent.yml")).expect_err("must fail");
        assert!(matches!(err, LedgerError::WorkLogRead { .. }));
    }

    #[test]
    fn load_reports_bad_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("worklog.yml");
        std::fs::write(&path, "\"2024-08-01\": [unclosed").expect("write");
        let err = load_work_log(&path).expect_err("must fail");
        assert!(matches!(err, LedgerError::WorkLogParse { .. }));
    }

    #[test]
    fn empty_document_is_empty_log() {
        assert!(parse_work_log("").expect("parse").is_empty());
        assert!(parse_work_log("~\n").expect("parse").is_empty());
    }

    #[test]
    fn starter_covers_yesterday_and_today() {
        let log = initial_worklog(fixed_day());
        let dates: Vec<&str> = log.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2025-10-30", "2025-10-31"]);
        for day in log.values() {
            assert_eq!(day.entries.len(), 2);
            assert!(!day.tasks.is_empty());
            for e in &day.entries {
                assert!(chrono::NaiveTime::parse_from_str(&e.start_time, "%H:%M").is_ok());
                assert!(chrono::NaiveTime::parse_from_str(&e.end_time, "%H:%M").is_ok());
            }
        }
    }

    #[test]
    fn starter_uses_every_status_and_field() {
        let yaml = initial_worklog_yaml(fixed_day()).expect("serialize");
        for field in [
            "work_log",
            "start_time",
            "end_time",
            "tasks",
            "status",
            "description",
            "descriptions",
            "jira_ticket",
            "qc_goal",
            "upnext_description",
            "github_pr",
            "blocker",
        ] {
            assert!(yaml.contains(field), "missing field {field}");
        }

        let log = initial_worklog(fixed_day());
        for status in Status::ALL {
            assert!(
                log.values()
                    .flat_map(|d| &d.tasks)
                    .any(|t| t.has_status(status)),
                "missing status {status}"
            );
        }
    }

    #[test]
    fn starter_round_trips_and_is_deterministic() {
        let yaml = initial_worklog_yaml(fixed_day()).expect("serialize");
        assert_eq!(yaml, initial_worklog_yaml(fixed_day()).expect("serialize"));
        let parsed = parse_work_log(&yaml).expect("parse");
        assert_eq!(parsed, initial_worklog(fixed_day()));
    }

    #[test]
    fn starter_populates_every_report_section() {
        let log = initial_worklog(fixed_day());
        let dates: Vec<String> = log.keys().cloned().collect();
        let result = classify(&log, &dates);
        assert!(!result.completed.is_empty());
        assert!(!result.next_up.is_empty());
        assert!(!result.blocked.is_empty());
    }
}
