//! # Catalog Crate
//!
//! Domain types and store interfaces for the movie advisor.
//!
//! ## Main Components
//!
//! - **types**: Movie, Decade, Preferences, Rating, RecommendationRecord
//! - **store**: `CatalogStore` / `RecommendationStore` traits the core consumes
//! - **memory**: `InMemoryStore`, a Vec-backed implementation of both traits
//! - **parser**: Parse `::`-separated catalog files into `Movie` rows
//! - **error**: The shared `AdvisorError` taxonomy
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{parser, CatalogStore, InMemoryStore};
//! use std::path::Path;
//!
//! let movies = parser::parse_catalog(Path::new("data/movies.dat"))?;
//! let store = InMemoryStore::with_movies(movies);
//! let genres = store.query_distinct(catalog::Attribute::Genre)?;
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{AdvisorError, Result};
pub use memory::InMemoryStore;
pub use store::{CatalogStore, RecommendationStore};
pub use types::{
    Attribute,
    Decade,
    DurationBucket,
    Movie,
    Preferences,
    Rating,
    RecommendationRecord,
};
