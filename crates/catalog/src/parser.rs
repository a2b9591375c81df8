//! Parser for catalog files.
//!
//! One movie per line, fields separated by `::`:
//!
//! ```text
//! title::genre::duration::style::popularity::year
//! Heat::Action::170::Dark::8.3::1995
//! ```
//!
//! Empty lines and lines starting with `#` are skipped.

use crate::error::{AdvisorError, Result};
use crate::types::Movie;
use std::fs;
use std::path::Path;

const FIELD_COUNT: usize = 6;

/// Parse a catalog file from disk
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn parse_catalog(path: &Path) -> Result<Vec<Movie>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_catalog_str(&content, &file)
}

/// Parse catalog lines already in memory; `file` is only used in errors
pub fn parse_catalog_str(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line_trimmed.split("::").map(str::trim).collect();
        if parts.len() != FIELD_COUNT {
            return Err(AdvisorError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("expected {} fields, found {}", FIELD_COUNT, parts.len()),
            });
        }

        let parse_error = |reason: String| AdvisorError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason,
        };

        let popularity: f32 = parts[4]
            .parse()
            .map_err(|e| parse_error(format!("Invalid popularity: {}", e)))?;
        if !(1.0..=10.0).contains(&popularity) {
            return Err(AdvisorError::InvalidValue {
                field: "popularity".to_string(),
                value: parts[4].to_string(),
            });
        }

        let movie = Movie {
            title: non_empty(parts[0], "title", &parse_error)?,
            genre: non_empty(parts[1], "genre", &parse_error)?,
            duration: parts[2]
                .parse()
                .map_err(|e| parse_error(format!("Invalid duration: {}", e)))?,
            style: non_empty(parts[3], "style", &parse_error)?,
            popularity,
            year: parts[5]
                .parse()
                .map_err(|e| parse_error(format!("Invalid year: {}", e)))?,
        };

        movies.push(movie);
    }

    Ok(movies)
}

fn non_empty(
    value: &str,
    field: &str,
    parse_error: &impl Fn(String) -> AdvisorError,
) -> Result<String> {
    if value.is_empty() {
        Err(parse_error(format!("Missing {}", field)))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_lines() {
        let content = "\
# title::genre::duration::style::popularity::year
Heat::Action::170::Dark::8.3::1995

Clueless::Comedy::97::Light::6::1995
";
        let movies = parse_catalog_str(content, "movies.dat").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Heat");
        assert_eq!(movies[0].duration, 170);
        assert_eq!(movies[0].popularity, 8.3);
        assert_eq!(movies[1].style, "Light");
        assert_eq!(movies[1].year, 1995);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "Heat::Action::170::Dark::8.3::1995\nBroken::Drama::long::Dark::5::1990\n";
        let err = parse_catalog_str(content, "movies.dat").unwrap_err();

        match err {
            AdvisorError::ParseError { file, line, reason } => {
                assert_eq!(file, "movies.dat");
                assert_eq!(line, 2);
                assert!(reason.contains("duration"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let err = parse_catalog_str("Heat::Action::170", "movies.dat").unwrap_err();
        assert!(matches!(err, AdvisorError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_out_of_scale_popularity() {
        let err = parse_catalog_str("Heat::Action::170::Dark::11::1995", "movies.dat").unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidValue { .. }));
    }
}
