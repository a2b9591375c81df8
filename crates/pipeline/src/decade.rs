//! Decade windowing for the catalog.
//!
//! Every recommendation request is scoped to one decade. The filter maps a
//! `"<decade>s"` label onto an inclusive year range and keeps only the movies
//! released inside it. An empty result is valid and is passed on as-is.

use catalog::{Decade, Movie, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Keeps movies whose release year falls inside one decade.
///
/// ## Algorithm
/// 1. Resolve the decade to `[start, start + 9]`
/// 2. Keep movies with `start <= year <= end`
/// 3. Preserve catalog order
#[derive(Debug, Clone, Copy)]
pub struct DecadeFilter {
    decade: Decade,
}

impl DecadeFilter {
    pub fn new(decade: Decade) -> Self {
        Self { decade }
    }

    /// Build a filter from a label such as `"1990s"`
    pub fn from_label(label: &str) -> Result<Self> {
        Ok(Self::new(label.parse()?))
    }

    pub fn decade(&self) -> Decade {
        self.decade
    }

    pub fn name(&self) -> &str {
        "DecadeFilter"
    }

    /// Apply the filter, consuming the catalog
    pub fn apply(&self, movies: Vec<Movie>) -> Vec<Movie> {
        let input = movies.len();
        let filtered: Vec<Movie> = movies
            .into_iter()
            .filter(|movie| self.decade.contains(movie.year))
            .collect();
        debug!(
            "{} {}: {} of {} movies kept",
            self.name(),
            self.decade,
            filtered.len(),
            input
        );
        filtered
    }
}

/// Distinct decade labels present in the catalog, ascending by decade
pub fn decades_available(movies: &[Movie]) -> Vec<String> {
    let decades: BTreeSet<Decade> = movies
        .iter()
        .map(|movie| Decade::of_year(movie.year))
        .collect();
    decades.into_iter().map(|decade| decade.label()).collect()
}

/// Inclusive year range of a decade label
pub fn range_of(label: &str) -> Result<(u16, u16)> {
    Ok(label.parse::<Decade>()?.range())
}

/// Movies released within the labelled decade
pub fn filter_by_decade(movies: Vec<Movie>, label: &str) -> Result<Vec<Movie>> {
    Ok(DecadeFilter::from_label(label)?.apply(movies))
}
