//! Selecting the ordered dates a command operates on.

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::model::WorkLog;
use crate::worklog::DATE_FORMAT;

fn parse_date(which: &'static str, value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| LedgerError::InvalidDate {
        which,
        value: value.to_string(),
    })
}

/// Resolve optional `--start-date`/`--end-date` into ascending ledger dates.
///
/// - neither bound: every date in the log;
/// - one bound: that single day;
/// - both: every logged day in the inclusive range.
///
/// # Errors
///
/// - [`LedgerError::EmptyWorkLog`] when no bound is given and the log is empty.
/// - [`LedgerError::InvalidDate`] for a bound that is not `YYYY-MM-DD`.
/// - [`LedgerError::EndBeforeStart`] for a reversed range.
/// - [`LedgerError::NoDataInRange`] when no logged day falls in the range.
pub fn select_dates(
    work_log: &WorkLog,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<String>, LedgerError> {
    let (start, end) = match (start, end) {
        (None, None) => {
            if work_log.is_empty() {
                return Err(LedgerError::EmptyWorkLog);
            }
            return Ok(work_log.keys().cloned().collect());
        }
        (Some(s), None) => (s, s),
        (None, Some(e)) => (e, e),
        (Some(s), Some(e)) => (s, e),
    };

    let start_date = parse_date("start", start)?;
    let end_date = parse_date("end", end)?;
    if end_date < start_date {
        return Err(LedgerError::EndBeforeStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let dates: Vec<String> = start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .filter(|d| work_log.contains_key(d))
        .collect();

    if dates.is_empty() {
        return Err(LedgerError::NoDataInRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    tracing::debug!(start, end, selected = dates.len(), "selected dates");
    Ok(dates)
}

/// `<first> to <last>`, also for a single day.
#[must_use]
pub fn range_label(dates: &[String]) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailyLog;

    fn log(dates: &[&str]) -> WorkLog {
        dates
            .iter()
            .map(|d| ((*d).to_string(), DailyLog::default()))
            .collect()
    }

    #[test]
    fn no_bounds_selects_everything_sorted() {
        let work = log(&["2024-08-03", "2024-08-01", "2024-08-02"]);
        assert_eq!(
            select_dates(&work, None, None).expect("dates"),
            vec!["2024-08-01", "2024-08-02", "2024-08-03"]
        );
    }

    #[test]
    fn no_bounds_on_empty_log_fails() {
        assert!(matches!(
            select_dates(&WorkLog::new(), None, None),
            Err(LedgerError::EmptyWorkLog)
        ));
    }

    #[test]
    fn single_bound_is_single_day() {
        let work = log(&["2024-08-01", "2024-08-02"]);
        assert_eq!(
            select_dates(&work, Some("2024-08-02"), None).expect("dates"),
            vec!["2024-08-02"]
        );
        assert_eq!(
            select_dates(&work, None, Some("2024-08-01")).expect("dates"),
            vec!["2024-08-01"]
        );
    }

    #[test]
    fn range_skips_unlogged_days() {
        let work = log(&["2024-07-31", "2024-08-01", "2024-08-03", "2024-08-05"]);
        assert_eq!(
            select_dates(&work, Some("2024-08-01"), Some("2024-08-04")).expect("dates"),
            vec!["2024-08-01", "2024-08-03"]
        );
    }

    #[test]
    fn range_errors() {
        let work = log(&["2024-08-01"]);
        assert!(matches!(
            select_dates(&work, Some("08/01/2024"), None),
            Err(LedgerError::InvalidDate { which: "start", .. })
        ));
        assert!(matches!(
            select_dates(&work, Some("2024-08-01"), Some("2024-13-01")),
            Err(LedgerError::InvalidDate { which: "end", .. })
        ));
        assert!(matches!(
            select_dates(&work, Some("2024-08-02"), Some("2024-08-01")),
            Err(LedgerError::EndBeforeStart { .. })
        ));
        assert!(matches!(
            select_dates(&work, Some("2024-09-01"), Some("2024-09-30")),
            Err(LedgerError::NoDataInRange { .. })
        ));
    }

    #[test]
    fn label_spans_first_and_last() {
        let dates = vec!["2024-08-01".to_string(), "2024-08-03".to_string()];
        assert_eq!(range_label(&dates), "2024-08-01 to 2024-08-03");
        assert_eq!(range_label(&dates[..1]), "2024-08-01 to 2024-08-01");
        assert_eq!(range_label(&[]), "");
    }
}
