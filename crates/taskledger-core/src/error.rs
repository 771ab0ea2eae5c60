use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    WorkLogNotFound,
    WorkLogParseError,
    WorkLogEmpty,
    InvalidDate,
    InvalidDateRange,
    NoDataInRange,
    SummariesUnreadable,
    TemplateWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::WorkLogNotFound => "E1001",
            Self::WorkLogParseError => "E1002",
            Self::WorkLogEmpty => "E1003",
            Self::InvalidDate => "E2001",
            Self::InvalidDateRange => "E2002",
            Self::NoDataInRange => "E2003",
            Self::SummariesUnreadable => "E3001",
            Self::TemplateWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WorkLogNotFound => "Work log file could not be read",
            Self::WorkLogParseError => "Work log YAML parse error",
            Self::WorkLogEmpty => "Work log has no entries",
            Self::InvalidDate => "Invalid date",
            Self::InvalidDateRange => "Invalid date range",
            Self::NoDataInRange => "No data in date range",
            Self::SummariesUnreadable => "Ticket summaries file unreadable",
            Self::TemplateWriteFailed => "Starter work log could not be written",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::WorkLogNotFound => {
                Some("Pass --file <path> or run `taskledger init` to create a work log.")
            }
            Self::WorkLogParseError => Some("Fix the YAML syntax in the work log and retry."),
            Self::WorkLogEmpty => Some("Add at least one dated entry to the work log."),
            Self::InvalidDate => Some("Use the YYYY-MM-DD format, e.g. 2024-08-01."),
            Self::InvalidDateRange => Some("Make sure --end-date is not before --start-date."),
            Self::NoDataInRange => Some("Widen the range or check the dates logged in the file."),
            Self::SummariesUnreadable => {
                Some("Provide a JSON object mapping ticket IDs to {key, summary, url}.")
            }
            Self::TemplateWriteFailed => Some("Check write permissions or pass --force."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures of the collaborators around the report engine.
///
/// Classification and rendering themselves are total and never produce
/// these.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("could not read work log '{}': {source}", .path.display())]
    WorkLogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse YAML from '{}': {source}", .path.display())]
    WorkLogParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no data found in the work log file")]
    EmptyWorkLog,

    #[error("invalid {which} date format '{value}', use YYYY-MM-DD")]
    InvalidDate { which: &'static str, value: String },

    #[error("end date {end} cannot be before start date {start}")]
    EndBeforeStart { start: String, end: String },

    #[error("no data found for the specified date range ({start} to {end})")]
    NoDataInRange { start: String, end: String },

    #[error("could not read ticket summaries '{}': {source}", .path.display())]
    SummariesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse ticket summaries JSON '{}': {source}", .path.display())]
    SummariesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize starter work log: {0}")]
    TemplateSerialize(#[source] serde_yaml::Error),
}

impl LedgerError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::WorkLogRead { .. } => ErrorCode::WorkLogNotFound,
            Self::WorkLogParse { .. } => ErrorCode::WorkLogParseError,
            Self::EmptyWorkLog => ErrorCode::WorkLogEmpty,
            Self::InvalidDate { .. } => ErrorCode::InvalidDate,
            Self::EndBeforeStart { .. } => ErrorCode::InvalidDateRange,
            Self::NoDataInRange { .. } => ErrorCode::NoDataInRange,
            Self::SummariesRead { .. } | Self::SummariesParse { .. } => {
                ErrorCode::SummariesUnreadable
            }
            Self::TemplateSerialize(_) => ErrorCode::TemplateWriteFailed,
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or_else(|| self.error_code().message())
            .to_string()
    }
}
