//! Interfaces to the external catalog/recommendation store.
//!
//! The recommendation core never talks to a database directly. It consumes
//! these two traits, so the same engine runs against SQLite in production
//! and against `InMemoryStore` in tests.
//!
//! Methods take `&self`; implementations serialize access internally
//! (a `Mutex` around the connection or the record list).

use crate::error::Result;
use crate::types::{Attribute, Movie, Rating, RecommendationRecord};

/// Read side: the movie catalog
pub trait CatalogStore: Send + Sync {
    /// Distinct values of a categorical column, ascending
    fn query_distinct(&self, attribute: Attribute) -> Result<Vec<String>>;

    /// Every movie, in catalog order
    fn query_all_movies(&self) -> Result<Vec<Movie>>;
}

/// Write side: recommendation records and their ratings
pub trait RecommendationStore: Send + Sync {
    /// Append a record with a null rating and a store-assigned timestamp
    fn insert_recommendation(&self, user: &str, movie: &Movie) -> Result<()>;

    /// Append one record per movie, in order, all or nothing
    ///
    /// Returns the number of records written.
    fn insert_recommendations(&self, user: &str, movies: &[Movie]) -> Result<usize>;

    /// Rate the most recent unrated record for `user`
    ///
    /// Returns `false` when there was nothing to rate.
    fn update_latest_rating(&self, user: &str, rating: Rating) -> Result<bool>;

    /// Rated records for `user`, most recent first
    fn query_recommendation_history(&self, user: &str) -> Result<Vec<RecommendationRecord>>;
}
