use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{movie_id, EnrichedMovie, FilterMode};

use super::AppState;

/// Cache policy from the original page loader: posters change rarely
const MOVIES_CACHE_CONTROL: &str = "max-age=2592000, must-revalidate";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    /// Overrides the persisted filter mode for this request only
    pub filter: Option<FilterMode>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    pub runtime: u32,
    pub stars: u8,
    pub poster: String,
    pub watched: bool,
}

impl MovieResponse {
    fn new(enriched: &EnrichedMovie, watched: bool) -> Self {
        Self {
            id: enriched.id(),
            title: enriched.movie.title.clone(),
            year: enriched.movie.year.clone(),
            rating: enriched.movie.rating.clone(),
            runtime: enriched.movie.runtime,
            stars: enriched.movie.stars,
            poster: enriched.poster.clone(),
            watched,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<MovieResponse>,
    pub filter: FilterMode,
    pub enriched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub title: String,
    pub year: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub watched: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterBody {
    pub filter: FilterMode,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// List enriched movies, filtered and sorted by title
pub async fn get_movies(
    State(state): State<AppState>,
    Query(query): Query<MoviesQuery>,
) -> Response {
    let inner = state.inner.read().await;
    let mode = query.filter.unwrap_or_else(|| inner.watchlist.filter_mode());

    let movies: Vec<MovieResponse> = inner
        .watchlist
        .apply_filter(&inner.movies, mode)
        .into_iter()
        .map(|enriched| MovieResponse::new(enriched, inner.watchlist.is_watched(&enriched.movie)))
        .collect();

    let body = MoviesResponse {
        movies,
        filter: mode,
        enriched_at: inner.enriched_at,
    };

    (
        [(header::CACHE_CONTROL, MOVIES_CACHE_CONTROL)],
        Json(body),
    )
        .into_response()
}

/// Toggle a movie's watched state by title/year identity
pub async fn toggle_watched(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Movie title cannot be empty".to_string(),
        ));
    }

    let id = movie_id(&request.title, &request.year);
    let mut inner = state.inner.write().await;
    let watched = inner.watchlist.toggle_id(id.clone());

    Ok(Json(ToggleResponse { id, watched }))
}

/// Clear the watched set.
///
/// Destructive; any "are you sure" prompt belongs to the caller.
pub async fn reset_watched(State(state): State<AppState>) -> StatusCode {
    let mut inner = state.inner.write().await;
    let cleared = inner.watchlist.watched_count();
    inner.watchlist.reset();

    tracing::info!(cleared, "Watched state reset");
    StatusCode::OK
}

/// Get the persisted filter mode
pub async fn get_filter(State(state): State<AppState>) -> Json<FilterBody> {
    let inner = state.inner.read().await;
    Json(FilterBody {
        filter: inner.watchlist.filter_mode(),
    })
}

/// Update the persisted filter mode
pub async fn set_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterBody>,
) -> Json<FilterBody> {
    let mut inner = state.inner.write().await;
    inner.watchlist.set_filter_mode(request.filter);
    Json(FilterBody {
        filter: request.filter,
    })
}
