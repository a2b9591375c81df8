//! Feature encoding for catalog rows and preference queries.
//!
//! Movies have two categorical attributes (genre, style) and three numeric
//! ones (duration, popularity, year). Models need a fixed-width numeric
//! vector, so categoricals are one-hot expanded.
//!
//! The column set is a `FeatureSchema` fitted on the decade-filtered catalog
//! slice. The same schema value encodes the training rows and the query, so a
//! query can never carry a column the model has not seen:
//! - a query category absent from the slice is dropped (encodes to nothing)
//! - a slice category absent from the query encodes to 0

use catalog::{Movie, Preferences};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// One named numeric column of the encoded space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Duration,
    Popularity,
    Year,
    /// One-hot indicator for a genre value
    Genre(String),
    /// One-hot indicator for a style value
    Style(String),
}

impl Column {
    /// Column name, e.g. `duration` or `genre_Action`
    pub fn name(&self) -> String {
        match self {
            Column::Duration => "duration".to_string(),
            Column::Popularity => "popularity".to_string(),
            Column::Year => "year".to_string(),
            Column::Genre(value) => format!("genre_{}", value),
            Column::Style(value) => format!("style_{}", value),
        }
    }
}

/// Anything that can be projected onto a schema: catalog rows and queries
pub trait FeatureRow {
    fn genre(&self) -> &str;
    fn style(&self) -> &str;
    fn duration(&self) -> f64;
    fn popularity(&self) -> f64;
    fn year(&self) -> f64;
}

impl FeatureRow for Movie {
    fn genre(&self) -> &str {
        &self.genre
    }

    fn style(&self) -> &str {
        &self.style
    }

    fn duration(&self) -> f64 {
        self.duration as f64
    }

    fn popularity(&self) -> f64 {
        self.popularity as f64
    }

    fn year(&self) -> f64 {
        self.year as f64
    }
}

/// The one-row frame built from a preference tuple
///
/// Its year is the midpoint of the requested decade.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    pub genre: String,
    pub style: String,
    pub duration: f64,
    pub popularity: f64,
    pub year: f64,
}

impl QueryRow {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            genre: preferences.genre.clone(),
            style: preferences.style.clone(),
            duration: preferences.duration as f64,
            popularity: preferences.min_popularity as f64,
            year: preferences.decade.midpoint() as f64,
        }
    }
}

impl FeatureRow for QueryRow {
    fn genre(&self) -> &str {
        &self.genre
    }

    fn style(&self) -> &str {
        &self.style
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn popularity(&self) -> f64 {
        self.popularity
    }

    fn year(&self) -> f64 {
        self.year
    }
}

/// Encoded rows as an `n x width` matrix, one row per input in input order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    records: Array2<f64>,
}

impl FeatureMatrix {
    pub fn width(&self) -> usize {
        self.records.ncols()
    }

    pub fn len(&self) -> usize {
        self.records.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.records.nrows() == 0
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.len()).then(|| self.records.row(index))
    }

    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    pub fn into_records(self) -> Array2<f64> {
        self.records
    }
}

/// Ordered list of numeric columns for one request
///
/// Layout: `duration, popularity, year`, then one `genre_*` column per
/// distinct genre (ascending), then one `style_*` column per distinct style
/// (ascending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<Column>,
}

impl FeatureSchema {
    /// Fit the column set on a catalog slice. Never fit on a query.
    pub fn fit(movies: &[Movie]) -> Self {
        let genres: BTreeSet<&str> = movies.iter().map(|m| m.genre.as_str()).collect();
        let styles: BTreeSet<&str> = movies.iter().map(|m| m.style.as_str()).collect();

        let mut columns = vec![Column::Duration, Column::Popularity, Column::Year];
        columns.extend(genres.into_iter().map(|g| Column::Genre(g.to_string())));
        columns.extend(styles.into_iter().map(|s| Column::Style(s.to_string())));

        Self { columns }
    }

    /// Same schema with one column removed (e.g. a prediction target)
    pub fn without(&self, column: &Column) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|c| *c != column)
                .cloned()
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &Column) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Encode a single row; categories not in the schema contribute nothing
    pub fn encode_row<R: FeatureRow + ?Sized>(&self, row: &R) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| match column {
                Column::Duration => row.duration(),
                Column::Popularity => row.popularity(),
                Column::Year => row.year(),
                Column::Genre(value) => one_hot(row.genre() == value),
                Column::Style(value) => one_hot(row.style() == value),
            })
            .collect()
    }

    /// Encode many rows in parallel; output order matches input order
    pub fn encode<R: FeatureRow + Sync>(&self, rows: &[R]) -> FeatureMatrix {
        let encoded: Vec<Vec<f64>> = rows.par_iter().map(|row| self.encode_row(row)).collect();

        let mut records = Array2::zeros((encoded.len(), self.len()));
        for (mut target, values) in records.rows_mut().into_iter().zip(&encoded) {
            target.assign(&ArrayView1::from(&values[..]));
        }
        FeatureMatrix { records }
    }

    /// Project a preference query onto this schema
    pub fn encode_query(&self, preferences: &Preferences) -> Array1<f64> {
        Array1::from(self.encode_row(&QueryRow::from_preferences(preferences)))
    }
}

fn one_hot(hit: bool) -> f64 {
    if hit { 1.0 } else { 0.0 }
}

/// Fit the column schema on a catalog slice
pub fn fit_columns(movies: &[Movie]) -> FeatureSchema {
    FeatureSchema::fit(movies)
}

/// Encode catalog rows (or query rows) with an existing schema
pub fn encode<R: FeatureRow + Sync>(rows: &[R], schema: &FeatureSchema) -> FeatureMatrix {
    schema.encode(rows)
}

/// Build the one-row query frame and project it onto `schema`
pub fn encode_query(preferences: &Preferences, schema: &FeatureSchema) -> Array1<f64> {
    schema.encode_query(preferences)
}
