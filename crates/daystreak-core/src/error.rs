//! Error types for daystreak-core.
//!
//! `LedgerError` is what callers of the ledger see; `StorageError` covers
//! the SQLite layer underneath it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The account already has a check-in recorded for this day.
    ///
    /// This is an expected outcome, not a fault: no state was mutated and
    /// the caller may re-query to show current status.
    #[error("already checked in for day {day}")]
    AlreadyCheckedIn { day: u64 },

    /// The supplied height maps to a day earlier than the account's stored
    /// last check-in day. Heights are trusted to be non-decreasing, so this
    /// signals a caller or clock bug and is surfaced rather than swallowed.
    #[error("height regression: last check-in at day {last_day}, supplied height maps to day {current_day}")]
    HeightRegression { last_day: u64, current_day: u64 },

    /// Storage-layer errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create or resolve the data directory
    #[error("failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked by another writer
    #[error("database is locked")]
    Locked,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}

/// Result type alias for LedgerError
pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

impl LedgerError {
    /// Whether this error is the expected "come back tomorrow" outcome.
    pub fn is_already_checked_in(&self) -> bool {
        matches!(self, LedgerError::AlreadyCheckedIn { .. })
    }
}
