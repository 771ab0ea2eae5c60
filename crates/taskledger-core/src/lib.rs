//! taskledger-core library.
//!
//! Turns a dated YAML work log into a status report: which work items moved
//! forward, which are planned next, and which are blocked.
//!
//! The pipeline is [`worklog::load_work_log`] → [`dates::select_dates`] →
//! [`classify::classify`] → one of the [`report`] renderers. Classification
//! and rendering are pure; only loading, config and summary files touch disk.
//!
//! # Conventions
//!
//! - **Errors**: [`error::LedgerError`] for library failures; `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod hours;
pub mod model;
pub mod report;
pub mod ticket;
pub mod worklog;

pub use classify::{Classification, TrackingKey, classify, is_non_feature_work};
pub use error::{ErrorCode, LedgerError};
pub use model::{DailyLog, DatedTaskRecord, Status, TaskRecord, WorkLog, WorkLogEntry};
