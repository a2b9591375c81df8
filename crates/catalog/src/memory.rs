//! In-memory store, used by tests and for quick experiments.

use crate::error::{AdvisorError, Result};
use crate::store::{CatalogStore, RecommendationStore};
use crate::types::{Attribute, Movie, Rating, RecommendationRecord};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

/// Holds the catalog in a Vec and appends records under a Mutex
#[derive(Debug, Default)]
pub struct InMemoryStore {
    movies: Vec<Movie>,
    records: Mutex<Vec<RecommendationRecord>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with a catalog
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Add a movie to the catalog
    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.push(movie);
    }

    /// Every record ever written, oldest first
    pub fn records(&self) -> Result<Vec<RecommendationRecord>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<RecommendationRecord>>> {
        self.records
            .lock()
            .map_err(|_| AdvisorError::StoreUnavailable("record lock poisoned".to_string()))
    }
}

impl CatalogStore for InMemoryStore {
    fn query_distinct(&self, attribute: Attribute) -> Result<Vec<String>> {
        let values: BTreeSet<&str> = self
            .movies
            .iter()
            .map(|movie| attribute.value_of(movie))
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    fn query_all_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.movies.clone())
    }
}

impl RecommendationStore for InMemoryStore {
    fn insert_recommendation(&self, user: &str, movie: &Movie) -> Result<()> {
        self.insert_recommendations(user, std::slice::from_ref(movie))?;
        Ok(())
    }

    fn insert_recommendations(&self, user: &str, movies: &[Movie]) -> Result<usize> {
        // One guard for the whole batch, so no other writer interleaves
        let mut records = self.lock()?;
        let recommended_at = Utc::now();
        for movie in movies {
            let id = records.len() as i64 + 1;
            records.push(RecommendationRecord {
                id,
                user: user.to_string(),
                movie: movie.clone(),
                recommended_at,
                rating: None,
            });
        }
        Ok(movies.len())
    }

    fn update_latest_rating(&self, user: &str, rating: Rating) -> Result<bool> {
        let mut records = self.lock()?;
        // Records are appended in time order, so the last match is the latest
        let latest = records
            .iter_mut()
            .rev()
            .find(|record| record.user == user && record.rating.is_none());
        match latest {
            Some(record) => {
                record.rating = Some(rating.value());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn query_recommendation_history(&self, user: &str) -> Result<Vec<RecommendationRecord>> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .rev()
            .filter(|record| record.user == user && record.rating.is_some())
            .cloned()
            .collect())
    }
}
