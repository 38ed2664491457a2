use std::collections::HashSet;

use crate::models::{EnrichedMovie, FilterMode, MovieRecord};
use crate::store::StateStore;

/// Persisted key holding the watched identity set (JSON array of strings)
pub const WATCHED_KEY: &str = "watchedMovies";
/// Persisted key holding the filter mode (JSON string)
pub const FILTER_KEY: &str = "filterBy";

/// Watched-state store.
///
/// Tracks which movies are marked watched plus the active filter mode, both
/// backed by an injected [`StateStore`]. Persisted state is read once at
/// construction and written through on every mutation; a store failure is
/// fatal to that store operation only, so the in-memory state keeps working
/// for the session.
pub struct Watchlist {
    store: Box<dyn StateStore>,
    watched: HashSet<String>,
    filter: FilterMode,
}

impl Watchlist {
    pub fn new(store: Box<dyn StateStore>) -> Self {
        let watched = match store.get(WATCHED_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Ignoring malformed persisted watched state");
                HashSet::new()
            }),
            Ok(None) => HashSet::new(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted watched state");
                HashSet::new()
            }
        };

        let filter = match store.get(FILTER_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Ignoring malformed persisted filter mode");
                FilterMode::default()
            }),
            Ok(None) => FilterMode::default(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted filter mode");
                FilterMode::default()
            }
        };

        tracing::debug!(watched = watched.len(), filter = ?filter, "Watchlist initialized");

        Self {
            store,
            watched,
            filter,
        }
    }

    /// Flips the watched state of a movie; returns the new state.
    ///
    /// Two toggles on the same record cancel out.
    pub fn toggle(&mut self, movie: &MovieRecord) -> bool {
        self.toggle_id(movie.id())
    }

    /// Flips the watched state for an identity key; returns the new state
    pub fn toggle_id(&mut self, id: String) -> bool {
        let now_watched = !self.watched.remove(&id);
        if now_watched {
            self.watched.insert(id.clone());
        }
        tracing::debug!(id = %id, watched = now_watched, "Toggled watched state");
        self.persist_watched();
        now_watched
    }

    pub fn is_watched(&self, movie: &MovieRecord) -> bool {
        self.watched.contains(&movie.id())
    }

    /// Returns the order-preserving subsequence of `movies` matching `mode`
    pub fn apply_filter<'a>(
        &self,
        movies: &'a [EnrichedMovie],
        mode: FilterMode,
    ) -> Vec<&'a EnrichedMovie> {
        movies
            .iter()
            .filter(|movie| match mode {
                FilterMode::Watched => self.watched.contains(&movie.id()),
                FilterMode::Unwatched => !self.watched.contains(&movie.id()),
                FilterMode::All => true,
            })
            .collect()
    }

    /// Clears the watched set entirely.
    ///
    /// Destructive and unconfirmed; confirmation is the caller's concern.
    pub fn reset(&mut self) {
        self.watched.clear();
        if let Err(err) = self.store.remove(WATCHED_KEY) {
            tracing::warn!(error = %err, "Failed to clear persisted watched state");
        }
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter = mode;
        if let Ok(raw) = serde_json::to_string(&mode) {
            if let Err(err) = self.store.set(FILTER_KEY, &raw) {
                tracing::warn!(error = %err, "Failed to persist filter mode");
            }
        }
    }

    fn persist_watched(&self) {
        // Sorted for a stable on-disk representation
        let mut ids: Vec<&str> = self.watched.iter().map(String::as_str).collect();
        ids.sort_unstable();
        if let Ok(raw) = serde_json::to_string(&ids) {
            if let Err(err) = self.store.set(WATCHED_KEY, &raw) {
                tracing::warn!(error = %err, "Failed to persist watched state");
            }
        }
    }
}
