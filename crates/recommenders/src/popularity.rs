//! Popularity Recommender - decision-tree popularity threshold
//!
//! Predicts how popular a movie matching the user's preferences tends to be,
//! then surfaces every movie in the decade at least that popular.
//!
//! ## Algorithm
//! 1. Fit a feature schema on the decade-filtered slice. Every encoded
//!    column is a feature, popularity included, so the requested minimum
//!    popularity steers the prediction
//! 2. Label each row with its popularity class
//! 3. Shuffle and split the rows 80/20 with a fixed seed
//! 4. Train a depth-limited Gini decision tree on the 80%
//! 5. Score the tree on the 20% (diagnostic only, logged)
//! 6. Predict a popularity for the encoded query
//! 7. Keep every movie with `popularity >= prediction`, in catalog order
//!
//! The prediction can select none or all of the slice; both are valid.

use crate::split::{LabelledDataset, shuffle_split};
use catalog::{AdvisorError, Movie, Preferences, Result};
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Axis};
use pipeline::{FeatureRow, FeatureSchema, Recommender};
use tracing::{debug, info, instrument, warn};

/// Smallest total sample weight a node needs before it may split
const MIN_WEIGHT_SPLIT: f32 = 2.0;
const MIN_WEIGHT_LEAF: f32 = 1.0;

/// A tree trained for one request
#[derive(Debug, Clone)]
pub struct PopularityModel {
    schema: FeatureSchema,
    tree: DecisionTree<f64, usize>,
    /// Popularity value of each class index, ascending
    classes: Vec<f64>,
    holdout_accuracy: f64,
    train_rows: usize,
    test_rows: usize,
}

impl PopularityModel {
    /// Feature columns the tree was trained on
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Distinct popularity values seen in the slice, ascending
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Share of held-out rows predicted exactly
    pub fn holdout_accuracy(&self) -> f64 {
        self.holdout_accuracy
    }

    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    pub fn test_rows(&self) -> usize {
        self.test_rows
    }

    /// Predicted popularity for the query
    pub fn predict(&self, preferences: &Preferences) -> Option<f64> {
        let query = self.schema.encode_query(preferences).insert_axis(Axis(0));
        let predicted: Array1<usize> = self.tree.predict(&query);
        predicted
            .first()
            .and_then(|&class| self.classes.get(class).copied())
    }
}

/// Decision-tree recommender
#[derive(Debug, Clone)]
pub struct PopularityRecommender {
    max_depth: usize,
    seed: u64,
    test_fraction: f64,
}

impl PopularityRecommender {
    pub const DEFAULT_MAX_DEPTH: usize = 5;
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            seed: Self::DEFAULT_SEED,
            test_fraction: Self::DEFAULT_TEST_FRACTION,
        }
    }

    /// Configure the maximum tree depth (default: 5)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Configure the seed for the train/test shuffle (default: 42)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Configure the held-out share (default: 0.2)
    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Train a fresh tree on `slice`
    ///
    /// Fails with `EmptyCatalogSlice` when the slice cannot be split into
    /// non-empty train and test sets.
    pub fn train(&self, slice: &[Movie], preferences: &Preferences) -> Result<PopularityModel> {
        let schema = FeatureSchema::fit(slice);
        let classes = popularity_classes(slice);
        let targets: Array1<usize> = slice
            .iter()
            .map(|movie| class_of(&classes, movie.popularity()))
            .collect();
        let dataset: LabelledDataset = Dataset::new(schema.encode(slice).into_records(), targets);

        let (train, test) = shuffle_split(&dataset, self.test_fraction, self.seed).ok_or_else(|| {
            AdvisorError::EmptyCatalogSlice {
                decade: preferences.decade.label(),
            }
        })?;

        let tree = DecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(self.max_depth))
            .min_weight_split(MIN_WEIGHT_SPLIT)
            .min_weight_leaf(MIN_WEIGHT_LEAF)
            .fit(&train)
            .map_err(|e| AdvisorError::ModelFit(e.to_string()))?;

        let predicted: Array1<usize> = tree.predict(test.records());
        let holdout_accuracy = predicted
            .confusion_matrix(&test)
            .map(|cm| cm.accuracy() as f64)
            .unwrap_or(0.0);

        debug!(
            "Trained popularity tree: depth {}, {} classes, {} train / {} test rows",
            tree.max_depth(),
            classes.len(),
            train.records().nrows(),
            test.records().nrows()
        );

        Ok(PopularityModel {
            schema,
            tree,
            classes,
            holdout_accuracy,
            train_rows: train.records().nrows(),
            test_rows: test.records().nrows(),
        })
    }
}

/// Distinct popularity values, ascending
fn popularity_classes(slice: &[Movie]) -> Vec<f64> {
    let mut classes: Vec<f64> = slice.iter().map(FeatureRow::popularity).collect();
    classes.sort_by(f64::total_cmp);
    classes.dedup_by(|a, b| a.total_cmp(b).is_eq());
    classes
}

fn class_of(classes: &[f64], popularity: f64) -> usize {
    classes
        .binary_search_by(|class| class.total_cmp(&popularity))
        .unwrap_or(0)
}

impl Default for PopularityRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender for PopularityRecommender {
    fn name(&self) -> &str {
        "PopularityRecommender"
    }

    #[instrument(skip(self, slice, preferences), fields(decade = %preferences.decade, slice = slice.len()))]
    fn recommend(&self, slice: &[Movie], preferences: &Preferences) -> Result<Vec<Movie>> {
        let model = match self.train(slice, preferences) {
            Ok(model) => model,
            Err(e) if e.is_empty_slice() => {
                debug!("Slice of {} rows too small to split, skipping training", slice.len());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        info!(
            "Decision tree held-out accuracy: {:.2}",
            model.holdout_accuracy()
        );

        let Some(threshold) = model.predict(preferences) else {
            warn!("Popularity tree produced no prediction");
            return Ok(Vec::new());
        };

        let selected: Vec<Movie> = slice
            .iter()
            .filter(|movie| movie.popularity() >= threshold)
            .cloned()
            .collect();
        debug!(
            "Predicted popularity {:.1}: {} of {} movies selected",
            threshold,
            selected.len(),
            slice.len()
        );
        Ok(selected)
    }
}
