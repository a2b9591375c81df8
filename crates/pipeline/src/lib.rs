//! Pipeline stages shared by the recommendation strategies.
//!
//! This crate provides:
//! - DecadeFilter for scoping the catalog to one decade
//! - FeatureSchema / FeatureMatrix for one-hot encoding movies and queries
//! - The Recommender trait implemented by each strategy
//!
//! ## Architecture
//! A request flows through the stages in order:
//! 1. DecadeFilter keeps the movies of the requested decade
//! 2. FeatureSchema is fitted on that slice
//! 3. The slice and the query are encoded with the same schema
//! 4. A Recommender fits its model and picks movies
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{DecadeFilter, FeatureSchema};
//!
//! let slice = DecadeFilter::new(preferences.decade).apply(movies);
//! let schema = FeatureSchema::fit(&slice);
//! let matrix = schema.encode(&slice);
//! let query = schema.encode_query(&preferences);
//! ```

pub mod decade;
pub mod features;
pub mod traits;

// Re-export main types
pub use decade::{DecadeFilter, decades_available, filter_by_decade, range_of};
pub use features::{
    Column, FeatureMatrix, FeatureRow, FeatureSchema, QueryRow, encode, encode_query, fit_columns,
};
pub use traits::Recommender;
