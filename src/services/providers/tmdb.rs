/// TMDB (The Movie Database) poster provider
///
/// Searches `/search/movie` with the title and year and takes the first
/// result's `poster_path`. Authentication is a v4 read access token sent as
/// a bearer token.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{PosterInfo, TmdbSearchResponse},
    services::providers::PosterProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_token: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    pub fn new(api_token: String, api_url: String, image_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_token,
            api_url,
            image_url,
        }
    }

    /// Builds the full image URL for a TMDB poster path
    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_url, poster_path)
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn lookup_poster(&self, title: &str, year: &str) -> AppResult<PosterInfo> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("query", title), ("year", year)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        let poster = search
            .results
            .first()
            .and_then(|movie| movie.poster_path.as_deref())
            .map(|path| self.poster_url(path));

        tracing::debug!(
            title = %title,
            year = %year,
            found = poster.is_some(),
            provider = "tmdb",
            "Poster lookup completed"
        );

        Ok(PosterInfo { url: poster })
    }

    fn clone_for_task(&self) -> Box<dyn PosterProvider> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
