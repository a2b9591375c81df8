//! Store crate for the movie advisor.
//!
//! The recommendation core treats persistence as an external collaborator
//! behind `catalog::CatalogStore` and `catalog::RecommendationStore`. This
//! crate provides the production implementation on SQLite via `rusqlite`.
//! Any failure reaches the core as `AdvisorError::StoreUnavailable`; there
//! is no retry here.

pub mod error;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;
