use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A movie entry from the curated dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Runtime in minutes
    pub runtime: u32,
    /// Score out of 10
    pub stars: u8,
}

impl MovieRecord {
    /// Watched-state identity for this record
    pub fn id(&self) -> String {
        movie_id(&self.title, &self.year)
    }
}

/// A movie record with poster artwork attached.
///
/// `poster` is empty when the lookup failed, timed out, or returned no
/// usable artwork. Produced only by the batch enricher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedMovie {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub poster: String,
}

impl EnrichedMovie {
    pub fn id(&self) -> String {
        self.movie.id()
    }
}

/// Derives the watched-state identity key for a title/year pair.
///
/// Lowercases the title and collapses runs of whitespace/punctuation into
/// single underscores, so `"Die Hard"` and `"die hard"` share a key.
/// Distinct films sharing a title and year collapse to the same key; that
/// coarse identity is intentional.
pub fn movie_id(title: &str, year: &str) -> String {
    let mut normalized = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !normalized.is_empty() {
                normalized.push('_');
            }
            normalized.extend(c.to_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    format!("{}_{}", normalized, year)
}

/// Which slice of the list the client wants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Watched,
    #[default]
    Unwatched,
    All,
}

/// Result of a poster lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PosterInfo {
    /// Full poster URL, if the provider found usable artwork
    pub url: Option<String>,
}

/// Loads the static movie dataset from a JSON file
pub fn load_movies(path: &str) -> AppResult<Vec<MovieRecord>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Dataset(format!("Failed to read {}: {}", path, e)))?;
    let records: Vec<MovieRecord> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Dataset(format!("Failed to parse {}: {}", path, e)))?;
    Ok(records)
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// A single TMDB search result (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}
