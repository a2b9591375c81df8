//! Errors raised by the SQLite store.

use catalog::AdvisorError;
use thiserror::Error;

/// Storage error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder
    #[error("Connection lock poisoned")]
    LockPoisoned,

    /// A stored timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// The core only sees an unavailable store; the detail travels in the message
impl From<StoreError> for AdvisorError {
    fn from(err: StoreError) -> Self {
        AdvisorError::StoreUnavailable(err.to_string())
    }
}

/// Storage result type
pub type StoreResult<T> = std::result::Result<T, StoreError>;
