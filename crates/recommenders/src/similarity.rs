//! Similarity Recommender - Euclidean k-nearest neighbours
//!
//! Finds the catalog movies closest to what the user described.
//!
//! ## Algorithm
//! 1. Fit a feature schema on the decade-filtered slice
//! 2. Encode every movie in the slice with that schema
//! 3. Encode the query with the same schema (duration = bucket midpoint,
//!    popularity = requested minimum, year = decade midpoint)
//! 4. Rank movies by Euclidean distance to the query
//! 5. Return the closest `k` (fewer if the slice is smaller)
//!
//! The index is rebuilt on every call. Equal distances keep catalog order.

use catalog::{AdvisorError, Movie, Preferences, Result};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use pipeline::{FeatureMatrix, FeatureSchema, Recommender};
use tracing::{debug, instrument};

/// One ranked result
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    pub movie: &'a Movie,
    /// Position in the slice the index was fitted on
    pub position: usize,
    pub distance: f64,
}

/// Encoded slice ready for nearest-neighbour queries
#[derive(Debug, Clone)]
pub struct NeighborIndex<'a> {
    movies: &'a [Movie],
    schema: FeatureSchema,
    matrix: FeatureMatrix,
}

impl<'a> NeighborIndex<'a> {
    /// Schema the index was fitted with; queries must be encoded with it
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The `k` rows nearest to `query`, ascending by distance
    pub fn kneighbors(&self, query: ArrayView1<'_, f64>, k: usize) -> Vec<Neighbor<'a>> {
        let distances = distances_to(self.matrix.records(), query);

        // Stable sort keeps catalog order on ties
        let mut order: Vec<usize> = (0..distances.len()).collect();
        order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
        order.truncate(k);

        order
            .into_iter()
            .map(|position| Neighbor {
                movie: &self.movies[position],
                position,
                distance: distances[position],
            })
            .collect()
    }
}

/// Euclidean distance between two equal-width vectors
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    (&a - &b).mapv(|d| d * d).sum().sqrt()
}

/// Distance from every row of `records` to `query`, computed in parallel
pub fn distances_to(records: &Array2<f64>, query: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut distances = Array1::zeros(records.nrows());
    Zip::from(&mut distances)
        .and(records.rows())
        .par_for_each(|distance, row| *distance = euclidean(row, query));
    distances
}

/// k-NN recommender over the encoded catalog slice
#[derive(Debug, Clone)]
pub struct SimilarityRecommender {
    /// Number of neighbours to return
    neighbors: usize,
}

impl SimilarityRecommender {
    pub const DEFAULT_NEIGHBORS: usize = 5;

    pub fn new() -> Self {
        Self {
            neighbors: Self::DEFAULT_NEIGHBORS,
        }
    }

    /// Configure how many neighbours to return (default: 5, minimum: 1)
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors.max(1);
        self
    }

    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Build a fresh index over `slice`
    ///
    /// Fails with `EmptyCatalogSlice` when there is nothing to index.
    pub fn fit<'a>(&self, slice: &'a [Movie], preferences: &Preferences) -> Result<NeighborIndex<'a>> {
        if slice.is_empty() {
            return Err(AdvisorError::EmptyCatalogSlice {
                decade: preferences.decade.label(),
            });
        }
        let schema = FeatureSchema::fit(slice);
        let matrix = schema.encode(slice);
        debug!(
            "Fitted neighbour index: {} rows x {} columns",
            matrix.len(),
            matrix.width()
        );
        Ok(NeighborIndex {
            movies: slice,
            schema,
            matrix,
        })
    }

    /// Nearest movies with their distances
    #[instrument(skip(self, slice, preferences), fields(decade = %preferences.decade, slice = slice.len()))]
    pub fn nearest<'a>(&self, slice: &'a [Movie], preferences: &Preferences) -> Result<Vec<Neighbor<'a>>> {
        let index = match self.fit(slice, preferences) {
            Ok(index) => index,
            Err(e) if e.is_empty_slice() => {
                debug!("Empty slice, skipping neighbour search");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let query = index.schema().encode_query(preferences);
        let neighbors = index.kneighbors(query.view(), self.neighbors);
        debug!(
            "Found {} neighbours (k = {}, slice = {})",
            neighbors.len(),
            self.neighbors,
            index.len()
        );
        Ok(neighbors)
    }
}

impl Default for SimilarityRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender for SimilarityRecommender {
    fn name(&self) -> &str {
        "SimilarityRecommender"
    }

    fn recommend(&self, slice: &[Movie], preferences: &Preferences) -> Result<Vec<Movie>> {
        Ok(self
            .nearest(slice, preferences)?
            .into_iter()
            .map(|neighbor| neighbor.movie.clone())
            .collect())
    }
}
