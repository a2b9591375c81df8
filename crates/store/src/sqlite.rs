//! SQLite implementation of the catalog and recommendation stores.
//!
//! Two tables:
//! - `movies`: the catalog, read-only to the recommendation core
//! - `recommendations`: one row per surfaced movie, with a nullable rating
//!
//! A single connection sits behind a `Mutex`, so one logical request
//! completes its store calls before the next one can start.

use crate::error::{StoreError, StoreResult};
use catalog::{
    Attribute, CatalogStore, Movie, Rating, RecommendationRecord, RecommendationStore, Result,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS movies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    genre       TEXT    NOT NULL,
    duration    INTEGER NOT NULL,
    style       TEXT    NOT NULL,
    popularity  REAL    NOT NULL,
    year        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS recommendations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user            TEXT    NOT NULL,
    title           TEXT    NOT NULL,
    genre           TEXT    NOT NULL,
    duration        INTEGER NOT NULL,
    style           TEXT    NOT NULL,
    popularity      REAL    NOT NULL,
    year            INTEGER NOT NULL,
    recommended_at  TEXT    NOT NULL,
    rating          INTEGER CHECK (rating BETWEEN 1 AND 5)
);

CREATE INDEX IF NOT EXISTS idx_recommendations_user_time
    ON recommendations (user, recommended_at);
";

/// Raw `recommendations` row before the timestamp is parsed
type RawRecord = (i64, String, Movie, String, Option<u8>);

/// SQLite-backed store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema
    pub fn open(path: &Path) -> StoreResult<Self> {
        info!("Opening movie database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// A private, throwaway database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        debug!("Schema applied");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Append movies to the catalog in one transaction
    pub fn import_movies(&self, movies: &[Movie]) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO movies (title, genre, duration, style, popularity, year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for movie in movies {
                stmt.execute(params![
                    movie.title,
                    movie.genre,
                    movie.duration,
                    movie.style,
                    movie.popularity as f64,
                    movie.year,
                ])?;
            }
        }
        tx.commit()?;
        info!("Imported {} movies", movies.len());
        Ok(movies.len())
    }

    /// Remove every catalog row (recommendation records are kept)
    pub fn clear_catalog(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM movies", [])?)
    }

    pub fn movie_count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn distinct(&self, attribute: Attribute) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        // Column names come from a closed enum, never from user input
        let column = attribute.as_str();
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM movies ORDER BY {column}"
        ))?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(values)
    }

    fn all_movies(&self) -> StoreResult<Vec<Movie>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT title, genre, duration, style, popularity, year FROM movies ORDER BY id",
        )?;
        let movies = stmt
            .query_map([], |row| Self::row_to_movie(row, 0))?
            .collect::<rusqlite::Result<Vec<Movie>>>()?;
        Ok(movies)
    }

    /// Insert a batch of records in one transaction
    ///
    /// The whole batch shares one timestamp; ids keep surfacing order.
    fn insert_batch(&self, user: &str, movies: &[Movie]) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let recommended_at = format_timestamp(Utc::now());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO recommendations
                    (user, title, genre, duration, style, popularity, year, recommended_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for movie in movies {
                stmt.execute(params![
                    user,
                    movie.title,
                    movie.genre,
                    movie.duration,
                    movie.style,
                    movie.popularity as f64,
                    movie.year,
                    recommended_at,
                ])?;
            }
        }
        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;
        Ok(movies.len())
    }

    fn rate_latest(&self, user: &str, rating: Rating) -> StoreResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE recommendations SET rating = ?1
             WHERE id = (
                 SELECT id FROM recommendations
                 WHERE user = ?2 AND rating IS NULL
                 ORDER BY recommended_at DESC, id DESC
                 LIMIT 1
             )",
            params![rating.value(), user],
        )?;
        Ok(changed > 0)
    }

    fn history(&self, user: &str) -> StoreResult<Vec<RecommendationRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user, title, genre, duration, style, popularity, year, recommended_at, rating
             FROM recommendations
             WHERE user = ?1 AND rating IS NOT NULL
             ORDER BY recommended_at DESC, id DESC",
        )?;
        let raw = stmt
            .query_map(params![user], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    Self::row_to_movie(row, 2)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<RawRecord>>>()?;

        raw.into_iter()
            .map(|(id, user, movie, recommended_at, rating)| {
                Ok(RecommendationRecord {
                    id,
                    user,
                    movie,
                    recommended_at: parse_timestamp(&recommended_at)?,
                    rating,
                })
            })
            .collect()
    }

    /// Read the six movie columns starting at `offset`
    fn row_to_movie(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Movie> {
        Ok(Movie {
            title: row.get(offset)?,
            genre: row.get(offset + 1)?,
            duration: row.get(offset + 2)?,
            style: row.get(offset + 3)?,
            popularity: row.get::<_, f64>(offset + 4)? as f32,
            year: row.get(offset + 5)?,
        })
    }
}

/// Fixed-width RFC 3339 so text order matches time order
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidTimestamp(format!("{value}: {e}")))
}

impl CatalogStore for SqliteStore {
    fn query_distinct(&self, attribute: Attribute) -> Result<Vec<String>> {
        Ok(self.distinct(attribute)?)
    }

    fn query_all_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.all_movies()?)
    }
}

impl RecommendationStore for SqliteStore {
    fn insert_recommendation(&self, user: &str, movie: &Movie) -> Result<()> {
        self.insert_batch(user, std::slice::from_ref(movie))?;
        Ok(())
    }

    fn insert_recommendations(&self, user: &str, movies: &[Movie]) -> Result<usize> {
        Ok(self.insert_batch(user, movies)?)
    }

    fn update_latest_rating(&self, user: &str, rating: Rating) -> Result<bool> {
        Ok(self.rate_latest(user, rating)?)
    }

    fn query_recommendation_history(&self, user: &str) -> Result<Vec<RecommendationRecord>> {
        Ok(self.history(user)?)
    }
}
