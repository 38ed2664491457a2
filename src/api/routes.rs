use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Movie list
        .route("/movies", get(handlers::get_movies))
        // Watched state
        .route("/watched/toggle", post(handlers::toggle_watched))
        .route("/watched/reset", post(handlers::reset_watched))
        // Filter mode
        .route("/filter", get(handlers::get_filter).put(handlers::set_filter))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // Outermost so the trace span can pick up the request ID
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
