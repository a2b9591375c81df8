//! Core domain types for the movie catalog and its feedback loop.
//!
//! - `Movie` is a read-only catalog row owned by the external store
//! - `Decade` is derived from a release year, never persisted
//! - `Preferences` is the transient per-request query
//! - `RecommendationRecord` is what the feedback loop writes back

use crate::error::{AdvisorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A movie in the catalog
///
/// `title` is the display key. It is not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub genre: String,
    /// Running time in minutes
    pub duration: u32,
    pub style: String,
    /// Popularity score on a 1-10 scale
    pub popularity: f32,
    pub year: u16,
}

/// Categorical catalog columns the presentation layer can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Genre,
    Style,
}

impl Attribute {
    /// Column name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Genre => "genre",
            Attribute::Style => "style",
        }
    }

    /// Read this attribute from a movie
    pub fn value_of<'a>(&self, movie: &'a Movie) -> &'a str {
        match self {
            Attribute::Genre => &movie.genre,
            Attribute::Style => &movie.style,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Decade
// =============================================================================

/// A ten-year window labelled `"<decade>s"`, e.g. `"1990s"` = 1990..=1999
///
/// The start never exceeds `Decade::MAX_START`, so `start + 9` always fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decade {
    start: u16,
}

impl Decade {
    /// Largest start whose ten-year window fits in a `u16` year
    pub const MAX_START: u16 = u16::MAX - 9;

    /// Decade containing `year`: floor(year / 10) * 10
    ///
    /// Years in the last partial window map to `MAX_START`.
    pub fn of_year(year: u16) -> Self {
        Self {
            start: (year / 10 * 10).min(Self::MAX_START),
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.start + 9
    }

    /// Inclusive `(start, end)` year range
    pub fn range(&self) -> (u16, u16) {
        (self.start(), self.end())
    }

    /// `(start + end) / 2`, used as the query year
    pub fn midpoint(&self) -> u16 {
        ((self.start() as u32 + self.end() as u32) / 2) as u16
    }

    pub fn contains(&self, year: u16) -> bool {
        year >= self.start() && year <= self.end()
    }

    pub fn label(&self) -> String {
        format!("{}s", self.start)
    }
}

impl FromStr for Decade {
    type Err = AdvisorError;

    /// Parse `"<int>s"`. The integer is taken as the range start verbatim.
    fn from_str(label: &str) -> Result<Self> {
        let invalid = || AdvisorError::InvalidDecadeLabel(label.to_string());
        let digits = label.strip_suffix('s').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let start = digits.parse::<u16>().map_err(|_| invalid())?;
        if start > Self::MAX_START {
            return Err(invalid());
        }
        Ok(Self { start })
    }
}

impl TryFrom<String> for Decade {
    type Error = AdvisorError;

    fn try_from(label: String) -> Result<Self> {
        label.parse()
    }
}

impl From<Decade> for String {
    fn from(decade: Decade) -> Self {
        decade.label()
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.start)
    }
}

// =============================================================================
// Preference Query
// =============================================================================

/// Duration choices offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    /// 0-100 minutes
    Short,
    /// 100-500 minutes
    Long,
}

impl DurationBucket {
    /// Inclusive minute bounds of the bucket
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            DurationBucket::Short => (0, 100),
            DurationBucket::Long => (100, 500),
        }
    }

    /// Midpoint fed to the encoder as the query duration
    pub fn midpoint(&self) -> u32 {
        let (min, max) = self.bounds();
        (min + max) / 2
    }
}

/// What the user asked for. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub genre: String,
    /// Duration in minutes (usually a bucket midpoint)
    pub duration: u32,
    pub style: String,
    /// Minimum popularity, 1-10
    pub min_popularity: u8,
    pub decade: Decade,
}

impl Preferences {
    /// Build a query from raw presentation values
    ///
    /// Fails with `InvalidDecadeLabel` if `decade_label` is malformed.
    pub fn new(
        genre: impl Into<String>,
        duration: u32,
        style: impl Into<String>,
        min_popularity: u8,
        decade_label: &str,
    ) -> Result<Self> {
        Ok(Self {
            genre: genre.into(),
            duration,
            style: style.into(),
            min_popularity,
            decade: decade_label.parse()?,
        })
    }
}

// =============================================================================
// Feedback Types
// =============================================================================

/// A feedback rating, guaranteed to be within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AdvisorError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// One surfaced recommendation, later optionally rated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: i64,
    /// Free-text user label
    pub user: String,
    /// Snapshot of the movie as it was recommended
    pub movie: Movie,
    pub recommended_at: DateTime<Utc>,
    pub rating: Option<u8>,
}
