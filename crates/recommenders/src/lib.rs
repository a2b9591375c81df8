//! # Recommenders Crate
//!
//! The two recommendation strategies offered to the user.
//!
//! ## Components
//!
//! ### Similarity Recommender
//! Euclidean k-nearest neighbours over the encoded `ndarray` matrix:
//! - "Movies most like what you described"
//! - Returns up to 5 movies, closest first
//!
//! ### Popularity Recommender
//! `linfa-trees` decision-tree popularity prediction:
//! - Predicts how popular a movie like the query tends to be
//! - Returns every movie in the decade at least that popular
//!
//! ## Example Usage
//!
//! ```ignore
//! use pipeline::{DecadeFilter, Recommender};
//! use recommenders::{PopularityRecommender, SimilarityRecommender};
//!
//! let slice = DecadeFilter::new(preferences.decade).apply(movies);
//!
//! let similar = SimilarityRecommender::new().recommend(&slice, &preferences)?;
//! let popular = PopularityRecommender::new().recommend(&slice, &preferences)?;
//! ```
//!
//! Both strategies fit their model from scratch on every call. Nothing is
//! cached between requests, so a model never outlives the slice it saw.

// Public modules
pub mod popularity;
pub mod similarity;
pub mod split;

// Re-export commonly used types
pub use popularity::{PopularityModel, PopularityRecommender};
pub use similarity::{Neighbor, NeighborIndex, SimilarityRecommender, distances_to, euclidean};
pub use split::{LabelledDataset, holdout_size, shuffle_split};
