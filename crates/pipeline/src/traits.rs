//! Core trait for the recommendation strategies.
//!
//! Both strategies take the decade-filtered catalog slice plus the user's
//! preferences and return the movies to surface, so the engine can treat
//! them interchangeably.

use catalog::{Movie, Preferences, Result};

/// A strategy that picks movies from a decade-filtered catalog slice.
///
/// ## Design Note
/// - `Send + Sync` allows a recommender to be shared by the engine
/// - Models are fitted inside `recommend` on every call, never cached
/// - An empty slice yields `Ok(vec![])`, never an error
pub trait Recommender: Send + Sync {
    /// Returns the name of this recommender (for logging/debugging)
    fn name(&self) -> &str;

    /// Rank or select movies from `slice` for `preferences`.
    ///
    /// # Arguments
    /// * `slice` - Catalog rows already restricted to `preferences.decade`
    /// * `preferences` - The user's query
    ///
    /// # Returns
    /// * `Ok(Vec<Movie>)` - Movies in surfacing order
    /// * `Err` - If the model cannot be built for a reason other than an empty slice
    fn recommend(&self, slice: &[Movie], preferences: &Preferences) -> Result<Vec<Movie>>;
}
