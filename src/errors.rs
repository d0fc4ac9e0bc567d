use thiserror::Error;

use crate::ledger::CalendarDate;

/// Error type that captures ledger and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no repair credits left")]
    InsufficientRepairs,
    #[error("cannot repair {0}: only days before today can be repaired")]
    InvalidRepairTarget(CalendarDate),
    #[error("{0} is already checked in")]
    AlreadyChecked(CalendarDate),
    #[error("cannot seed {date}: {reason}")]
    InvalidSeedDate { date: CalendarDate, reason: String },
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("state schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Error type for configuration loading and persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}
