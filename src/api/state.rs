use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::EnrichedMovie;
use crate::services::Watchlist;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state behind the lock
pub struct AppStateInner {
    /// Enriched movie list, sorted by title at startup and fixed for the
    /// process lifetime
    pub movies: Vec<EnrichedMovie>,
    pub watchlist: Watchlist,
    pub enriched_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(movies: Vec<EnrichedMovie>, watchlist: Watchlist) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                movies,
                watchlist,
                enriched_at: Utc::now(),
            })),
        }
    }
}
