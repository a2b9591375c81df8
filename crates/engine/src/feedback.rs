//! Feedback Recorder
//!
//! Closes the loop between recommendations and ratings:
//! - every surfaced movie is written as a record with no rating
//! - a later rating lands on the user's newest unrated record
//!
//! Rating without a pending record is a silent no-op, since a user may rate
//! without having just received a recommendation.

use catalog::{Movie, Rating, RecommendationStore, Result};
use std::sync::Arc;
use tracing::debug;

/// Writes recommendation records and ratings through the store
pub struct FeedbackRecorder<S> {
    store: Arc<S>,
}

impl<S> Clone for FeedbackRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: RecommendationStore> FeedbackRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append one unrated record for `user`
    pub fn record(&self, user: &str, movie: &Movie) -> Result<()> {
        self.store.insert_recommendation(user, movie)
    }

    /// Record every movie, in surfacing order, as one batch
    ///
    /// Either the whole result set is recorded or none of it.
    pub fn record_all(&self, user: &str, movies: &[Movie]) -> Result<usize> {
        if movies.is_empty() {
            return Ok(0);
        }
        let written = self.store.insert_recommendations(user, movies)?;
        debug!("Recorded {} recommendations for {:?}", written, user);
        Ok(written)
    }

    /// Rate the newest unrated record for `user`
    ///
    /// Fails with `InvalidRating` outside 1..=5. Returns `false` when there
    /// was nothing to rate.
    pub fn rate_latest(&self, user: &str, rating: u8) -> Result<bool> {
        let rating = Rating::new(rating)?;
        let updated = self.store.update_latest_rating(user, rating)?;
        if !updated {
            debug!("No unrated recommendation for {:?}, rating ignored", user);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{AdvisorError, InMemoryStore};

    fn movie(title: &str) -> Movie {
        Movie {
            title: title.to_string(),
            genre: "Drama".to_string(),
            duration: 100,
            style: "Dark".to_string(),
            popularity: 6.0,
            year: 1995,
        }
    }

    fn create_test_recorder() -> (Arc<InMemoryStore>, FeedbackRecorder<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), FeedbackRecorder::new(store))
    }

    #[test]
    fn test_record_all_keeps_order() {
        let (store, recorder) = create_test_recorder();

        let count = recorder.record_all("ana", &[movie("A"), movie("B"), movie("C")]).unwrap();

        assert_eq!(count, 3);
        let records = store.records().unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(records.iter().all(|r| r.user == "ana" && r.rating.is_none()));
    }

    #[test]
    fn test_rate_latest_bounds() {
        let (_store, recorder) = create_test_recorder();
        recorder.record("ana", &movie("A")).unwrap();
        recorder.record("ana", &movie("B")).unwrap();

        assert!(matches!(recorder.rate_latest("ana", 0), Err(AdvisorError::InvalidRating(0))));
        assert!(matches!(recorder.rate_latest("ana", 6), Err(AdvisorError::InvalidRating(6))));
        assert!(recorder.rate_latest("ana", 1).unwrap());
        assert!(recorder.rate_latest("ana", 5).unwrap());
    }

    #[test]
    fn test_rate_latest_without_pending_record_is_noop() {
        let (store, recorder) = create_test_recorder();
        recorder.record("bo", &movie("A")).unwrap();

        assert!(!recorder.rate_latest("ana", 3).unwrap());

        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rating, None);
    }

    #[test]
    fn test_invalid_rating_changes_nothing() {
        let (store, recorder) = create_test_recorder();
        recorder.record("ana", &movie("A")).unwrap();

        assert!(recorder.rate_latest("ana", 9).is_err());
        assert_eq!(store.records().unwrap()[0].rating, None);
    }
}
