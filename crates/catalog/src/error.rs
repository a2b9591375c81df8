//! Error types shared by every crate in the workspace.
//!
//! The recommendation core has a small, closed taxonomy:
//! - malformed decade labels
//! - out-of-range feedback ratings
//! - empty catalog slices (absorbed by the recommenders)
//! - external store failures
//!
//! plus the variants needed to parse a catalog file on import.

use thiserror::Error;

/// Errors raised by the recommendation core and its collaborators
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Decade label did not match the `"<int>s"` pattern
    #[error("Invalid decade label: {0:?}")]
    InvalidDecadeLabel(String),

    /// Feedback rating outside 1..=5
    #[error("Invalid rating {0}: expected a value between 1 and 5")]
    InvalidRating(u8),

    /// Decade filter left too few movies to fit a model on
    ///
    /// Recommenders turn this into an empty result rather than surfacing it.
    #[error("Catalog slice for {decade} is too small to fit a model")]
    EmptyCatalogSlice { decade: String },

    /// A model could not be fitted on a non-empty slice
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// The external catalog/recommendation store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// I/O error while reading a catalog file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line in a catalog file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl AdvisorError {
    /// True for the "nothing to recommend from" case
    pub fn is_empty_slice(&self) -> bool {
        matches!(self, AdvisorError::EmptyCatalogSlice { .. })
    }
}

/// Convenience type alias for Results in this workspace
pub type Result<T> = std::result::Result<T, AdvisorError>;
