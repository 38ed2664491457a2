use std::time::Duration;

use watchlist_api::{
    api::{create_router, AppState},
    config::Config,
    models,
    services::{providers::TmdbProvider, Enricher, Watchlist},
    store::JsonFileStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchlist_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let records = models::load_movies(&config.movies_path)?;
    tracing::info!(
        records = records.len(),
        path = %config.movies_path,
        "Loaded movie dataset"
    );

    // Enrich once at startup; the list is fixed for the process lifetime
    let provider = TmdbProvider::new(
        config.tmdb_api_token.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    );
    let enricher = Enricher::new(
        config.lookup_concurrency,
        Duration::from_millis(config.lookup_timeout_ms),
    );
    let mut movies = enricher.enrich(records, &provider).await;

    // Enricher output is completion-ordered; the page shows titles A-Z
    movies.sort_by(|a, b| a.movie.title.cmp(&b.movie.title));

    let store = JsonFileStore::open(&config.state_path)?;
    let watchlist = Watchlist::new(Box::new(store));

    let state = AppState::new(movies, watchlist);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
