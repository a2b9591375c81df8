//! # Recommendation Engine
//!
//! This module coordinates one recommendation request end to end:
//! 1. Read the catalog from the store
//! 2. Keep the movies of the requested decade
//! 3. Fit the chosen strategy on that slice and pick movies
//! 4. Record every picked movie for the requesting user
//! 5. Return the picks in surfacing order
//!
//! Records are written only after step 3 has produced its full result, so
//! a failed computation leaves no partial feedback behind.
//!
//! The requesting user travels in an explicit `Session`; there is no
//! process-wide notion of a current user.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use catalog::{
    Attribute, CatalogStore, Movie, Preferences, RecommendationRecord, RecommendationStore, Result,
};
use pipeline::{DecadeFilter, Recommender, decades_available};
use recommenders::{PopularityRecommender, SimilarityRecommender};

use crate::feedback::FeedbackRecorder;

/// Who is asking. A free-text label, not an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Which recommender to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Euclidean k-nearest neighbours
    Similarity,
    /// Decision-tree popularity threshold
    Popularity,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Similarity => f.write_str("similarity"),
            Strategy::Popularity => f.write_str("popularity"),
        }
    }
}

/// Model settings for both recommenders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// k for the similarity recommender
    pub neighbors: usize,
    /// Maximum decision-tree depth
    pub max_depth: usize,
    /// Seed for the train/test shuffle
    pub seed: u64,
    /// Held-out share for the accuracy diagnostic
    pub test_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbors: SimilarityRecommender::DEFAULT_NEIGHBORS,
            max_depth: PopularityRecommender::DEFAULT_MAX_DEPTH,
            seed: PopularityRecommender::DEFAULT_SEED,
            test_fraction: PopularityRecommender::DEFAULT_TEST_FRACTION,
        }
    }
}

/// Entry point for the presentation layer
pub struct RecommendationEngine<S> {
    store: Arc<S>,
    similarity: SimilarityRecommender,
    popularity: PopularityRecommender,
    feedback: FeedbackRecorder<S>,
}

impl<S> Clone for RecommendationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            similarity: self.similarity.clone(),
            popularity: self.popularity.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

impl<S> RecommendationEngine<S>
where
    S: CatalogStore + RecommendationStore,
{
    /// Create an engine with default model settings
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with explicit model settings
    pub fn with_config(store: Arc<S>, config: EngineConfig) -> Self {
        let similarity = SimilarityRecommender::new().with_neighbors(config.neighbors);
        let popularity = PopularityRecommender::new()
            .with_max_depth(config.max_depth)
            .with_seed(config.seed)
            .with_test_fraction(config.test_fraction);
        let feedback = FeedbackRecorder::new(store.clone());
        Self {
            store,
            similarity,
            popularity,
            feedback,
        }
    }

    /// Decade labels present in the catalog, ascending
    pub fn list_decades(&self) -> Result<Vec<String>> {
        let movies = self.store.query_all_movies()?;
        Ok(decades_available(&movies))
    }

    /// Distinct genres or styles, ascending
    pub fn list_distinct(&self, attribute: Attribute) -> Result<Vec<String>> {
        self.store.query_distinct(attribute)
    }

    /// Up to k movies closest to the preferences, nearest first
    pub fn recommend_similarity(&self, session: &Session, preferences: &Preferences) -> Result<Vec<Movie>> {
        self.run(session, &self.similarity, preferences)
    }

    /// Every movie in the decade at least as popular as the tree predicts
    pub fn recommend_popularity(&self, session: &Session, preferences: &Preferences) -> Result<Vec<Movie>> {
        self.run(session, &self.popularity, preferences)
    }

    /// Dispatch on a strategy chosen at runtime
    pub fn recommend(
        &self,
        session: &Session,
        strategy: Strategy,
        preferences: &Preferences,
    ) -> Result<Vec<Movie>> {
        match strategy {
            Strategy::Similarity => self.recommend_similarity(session, preferences),
            Strategy::Popularity => self.recommend_popularity(session, preferences),
        }
    }

    /// Rate the session user's newest unrated recommendation
    ///
    /// Returns `false` if there was nothing to rate.
    pub fn submit_rating(&self, session: &Session, rating: u8) -> Result<bool> {
        self.feedback.rate_latest(session.user(), rating)
    }

    /// The session user's rated recommendations, most recent first
    pub fn history(&self, session: &Session) -> Result<Vec<RecommendationRecord>> {
        self.store.query_recommendation_history(session.user())
    }

    fn run(
        &self,
        session: &Session,
        recommender: &dyn Recommender,
        preferences: &Preferences,
    ) -> Result<Vec<Movie>> {
        let start_time = Instant::now();

        let movies = self.store.query_all_movies()?;
        let catalog_size = movies.len();

        let slice = DecadeFilter::new(preferences.decade).apply(movies);
        debug!(
            "Decade {} keeps {} of {} movies",
            preferences.decade,
            slice.len(),
            catalog_size
        );

        let picks = recommender.recommend(&slice, preferences)?;

        // Only a complete result is recorded
        self.feedback.record_all(session.user(), &picks)?;

        info!(
            "{} returned {} movies for {:?} in {:.2?}",
            recommender.name(),
            picks.len(),
            session.user(),
            start_time.elapsed()
        );
        Ok(picks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{AdvisorError, InMemoryStore};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn movie(title: &str, genre: &str, duration: u32, style: &str, popularity: f32, year: u16) -> Movie {
        Movie {
            title: title.to_string(),
            genre: genre.to_string(),
            duration,
            style: style.to_string(),
            popularity,
            year,
        }
    }

    /// A small catalog spanning three decades
    fn build_test_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::with_movies(vec![
            movie("Pulp Fiction", "Crime", 154, "Dark", 9.0, 1994),
            movie("Toy Story", "Animation", 81, "Light", 8.0, 1995),
            movie("Fargo", "Crime", 98, "Dark", 8.0, 1996),
            movie("Heat", "Action", 170, "Dark", 8.0, 1995),
            movie("Clueless", "Comedy", 97, "Light", 7.0, 1995),
            movie("Speed", "Action", 116, "Light", 7.0, 1994),
            movie("Jumanji", "Adventure", 104, "Light", 7.0, 1995),
            movie("Alien", "Horror", 117, "Dark", 8.0, 1979),
            movie("Gladiator", "Action", 155, "Epic", 8.0, 2000),
        ]))
    }

    fn build_test_engine() -> (RecommendationEngine<InMemoryStore>, Arc<InMemoryStore>) {
        let store = build_test_store();
        (RecommendationEngine::new(store.clone()), store)
    }

    // ============================================================================
    // Listing
    // ============================================================================

    #[test]
    fn test_list_decades() {
        let (engine, _store) = build_test_engine();
        assert_eq!(engine.list_decades().unwrap(), vec!["1970s", "1990s", "2000s"]);
    }

    #[test]
    fn test_list_distinct() {
        let (engine, _store) = build_test_engine();
        assert_eq!(
            engine.list_distinct(Attribute::Style).unwrap(),
            vec!["Dark", "Epic", "Light"]
        );
        assert_eq!(engine.list_distinct(Attribute::Genre).unwrap().len(), 7);
    }

    // ============================================================================
    // Similarity
    // ============================================================================

    #[test]
    fn test_similarity_records_each_pick_in_order() {
        let (engine, store) = build_test_engine();
        let session = Session::new("ana");
        let preferences = Preferences::new("Crime", 100, "Dark", 8, "1990s").unwrap();

        let picks = engine.recommend_similarity(&session, &preferences).unwrap();

        assert_eq!(picks.len(), 5);
        assert_eq!(picks[0].title, "Fargo");
        assert!(picks.iter().all(|m| (1990..=1999).contains(&m.year)));

        let records = store.records().unwrap();
        assert_eq!(records.len(), 5);
        for (record, pick) in records.iter().zip(&picks) {
            assert_eq!(record.user, "ana");
            assert_eq!(&record.movie, pick);
            assert_eq!(record.rating, None);
        }
    }

    #[test]
    fn test_similarity_small_decade() {
        let (engine, store) = build_test_engine();
        let preferences = Preferences::new("Horror", 300, "Dark", 9, "1970s").unwrap();

        let picks = engine.recommend_similarity(&Session::new("ana"), &preferences).unwrap();

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].title, "Alien");
        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_decade_records_nothing() {
        let (engine, store) = build_test_engine();
        let session = Session::new("ana");
        let preferences = Preferences::new("Crime", 50, "Dark", 5, "1960s").unwrap();

        assert!(engine.recommend_similarity(&session, &preferences).unwrap().is_empty());
        assert!(engine.recommend_popularity(&session, &preferences).unwrap().is_empty());
        assert!(store.records().unwrap().is_empty());
    }

    // ============================================================================
    // Popularity
    // ============================================================================

    #[test]
    fn test_popularity_picks_stay_in_decade_and_catalog_order() {
        let (engine, store) = build_test_engine();
        let preferences = Preferences::new("Crime", 300, "Dark", 8, "1990s").unwrap();

        let picks = engine
            .recommend(&Session::new("bo"), Strategy::Popularity, &preferences)
            .unwrap();

        let decade_titles = [
            "Pulp Fiction", "Toy Story", "Fargo", "Heat", "Clueless", "Speed", "Jumanji",
        ];
        let mut last_position = None;
        for pick in &picks {
            let position = decade_titles.iter().position(|t| *t == pick.title).unwrap();
            assert!(last_position.is_none_or(|last| position > last));
            last_position = Some(position);
        }
        assert_eq!(store.records().unwrap().len(), picks.len());
    }

    #[test]
    fn test_popularity_single_movie_decade_short_circuits() {
        let (engine, store) = build_test_engine();
        let preferences = Preferences::new("Action", 300, "Epic", 8, "2000s").unwrap();

        let picks = engine.recommend_popularity(&Session::new("bo"), &preferences).unwrap();

        assert!(picks.is_empty());
        assert!(store.records().unwrap().is_empty());
    }

    // ============================================================================
    // Feedback
    // ============================================================================

    #[test]
    fn test_submit_rating_rates_latest_for_session_user_only() {
        let (engine, store) = build_test_engine();
        let preferences = Preferences::new("Horror", 300, "Dark", 9, "1970s").unwrap();
        engine.recommend_similarity(&Session::new("ana"), &preferences).unwrap();
        engine.recommend_similarity(&Session::new("bo"), &preferences).unwrap();

        assert!(engine.submit_rating(&Session::new("ana"), 4).unwrap());

        let records = store.records().unwrap();
        assert_eq!(records[0].rating, Some(4));
        assert_eq!(records[1].rating, None);

        let history = engine.history(&Session::new("ana")).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].movie.title, "Alien");
        assert!(engine.history(&Session::new("bo")).unwrap().is_empty());
    }

    #[test]
    fn test_submit_rating_validation_and_noop() {
        let (engine, store) = build_test_engine();
        let session = Session::new("ana");

        assert!(matches!(engine.submit_rating(&session, 0), Err(AdvisorError::InvalidRating(0))));
        assert!(matches!(engine.submit_rating(&session, 6), Err(AdvisorError::InvalidRating(6))));
        assert!(!engine.submit_rating(&session, 5).unwrap());
        assert!(store.records().unwrap().is_empty());
    }

    /// Serves the catalog but refuses every record write
    struct ReadOnlyStore {
        inner: InMemoryStore,
    }

    impl CatalogStore for ReadOnlyStore {
        fn query_distinct(&self, attribute: Attribute) -> Result<Vec<String>> {
            self.inner.query_distinct(attribute)
        }

        fn query_all_movies(&self) -> Result<Vec<Movie>> {
            self.inner.query_all_movies()
        }
    }

    impl RecommendationStore for ReadOnlyStore {
        fn insert_recommendation(&self, _user: &str, _movie: &Movie) -> Result<()> {
            Err(AdvisorError::StoreUnavailable("read-only".to_string()))
        }

        fn insert_recommendations(&self, _user: &str, _movies: &[Movie]) -> Result<usize> {
            Err(AdvisorError::StoreUnavailable("read-only".to_string()))
        }

        fn update_latest_rating(&self, user: &str, rating: catalog::Rating) -> Result<bool> {
            self.inner.update_latest_rating(user, rating)
        }

        fn query_recommendation_history(&self, user: &str) -> Result<Vec<RecommendationRecord>> {
            self.inner.query_recommendation_history(user)
        }
    }

    #[test]
    fn test_store_failure_surfaces_and_records_nothing() {
        let store = Arc::new(ReadOnlyStore {
            inner: InMemoryStore::with_movies(build_test_store().query_all_movies().unwrap()),
        });
        let engine = RecommendationEngine::new(store.clone());
        let preferences = Preferences::new("Crime", 100, "Dark", 8, "1990s").unwrap();

        let result = engine.recommend_similarity(&Session::new("ana"), &preferences);

        assert!(matches!(result, Err(AdvisorError::StoreUnavailable(_))));
        assert!(store.inner.records().unwrap().is_empty());
    }

    #[test]
    fn test_with_config_changes_k() {
        let store = build_test_store();
        let config = EngineConfig {
            neighbors: 2,
            ..EngineConfig::default()
        };
        let engine = RecommendationEngine::with_config(store, config);
        let preferences = Preferences::new("Crime", 100, "Dark", 8, "1990s").unwrap();

        let picks = engine.recommend_similarity(&Session::new("ana"), &preferences).unwrap();
        assert_eq!(picks.len(), 2);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Similarity.to_string(), "similarity");
        assert_eq!(Strategy::Popularity.to_string(), "popularity");
    }
}
