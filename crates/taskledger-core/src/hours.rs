//! Clocked hours over selected dates.

use chrono::NaiveTime;
use serde::Serialize;

use crate::dates::range_label;
use crate::model::WorkLog;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursSummary {
    pub start: String,
    pub end: String,
    pub hours: f64,
    pub skipped_entries: usize,
}

impl HoursSummary {
    /// `Total hours worked from <start> to <end>: <h.hh>`
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "Total hours worked from {} to {}: {:.2}",
            self.start, self.end, self.hours
        )
    }

    #[must_use]
    pub fn range_label(&self) -> String {
        range_label(&[self.start.clone(), self.end.clone()])
    }
}

/// Sum `end - start` for every parsable entry on `dates`.
///
/// Entries whose times are not `HH:MM` are skipped and counted. A span that
/// ends before it starts contributes a negative amount.
#[must_use]
pub fn compute_hours(work_log: &WorkLog, dates: &[String]) -> HoursSummary {
    let mut minutes: i64 = 0;
    let mut skipped_entries = 0;

    for date in dates {
        let Some(day) = work_log.get(date) else {
            continue;
        };
        for entry in &day.entries {
            let start = NaiveTime::parse_from_str(&entry.start_time, TIME_FORMAT);
            let end = NaiveTime::parse_from_str(&entry.end_time, TIME_FORMAT);
            match (start, end) {
                (Ok(start), Ok(end)) => minutes += (end - start).num_minutes(),
                _ => {
                    skipped_entries += 1;
                    tracing::warn!(
                        date = %date,
                        start_time = %entry.start_time,
                        end_time = %entry.end_time,
                        "could not parse time entry, skipping"
                    );
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let hours = minutes as f64 / 60.0;

    HoursSummary {
        start: dates.first().cloned().unwrap_or_default(),
        end: dates.last().cloned().unwrap_or_default(),
        hours,
        skipped_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyLog, WorkLogEntry};

    fn day(entries: &[(&str, &str)]) -> DailyLog {
        DailyLog {
            entries: entries
                .iter()
                .map(|(s, e)| WorkLogEntry {
                    start_time: (*s).to_string(),
                    end_time: (*e).to_string(),
                })
                .collect(),
            tasks: Vec::new(),
        }
    }

    #[test]
    fn sums_entries_over_selected_dates() {
        let mut log = WorkLog::new();
        log.insert("2024-08-01".into(), day(&[("09:00", "12:30"), ("13:30", "17:00")]));
        log.insert("2024-08-02".into(), day(&[("10:00", "16:00")]));

        let one = compute_hours(&log, &["2024-08-01".to_string()]);
        assert_eq!(one.line(), "Total hours worked from 2024-08-01 to 2024-08-01: 7.00");

        let both = compute_hours(&log, &["2024-08-01".to_string(), "2024-08-02".to_string()]);
        assert!((both.hours - 13.0).abs() < f64::EPSILON);
        assert_eq!(both.range_label(), "2024-08-01 to 2024-08-02");
    }

    #[test]
    fn skips_malformed_entries() {
        let mut log = WorkLog::new();
        log.insert(
            "2024-08-01".into(),
            day(&[("9am", "12:00"), ("13:00", "14:15"), ("", "")]),
        );
        let summary = compute_hours(&log, &["2024-08-01".to_string()]);
        assert_eq!(summary.skipped_entries, 2);
        assert!((summary.hours - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn reversed_span_counts_negative() {
        let mut log = WorkLog::new();
        log.insert("2024-08-01".into(), day(&[("17:00", "16:00")]));
        let summary = compute_hours(&log, &["2024-08-01".to_string()]);
        assert!((summary.hours + 1.0).abs() < f64::EPSILON);
    }
}
