/// Poster artwork provider abstraction
///
/// The batch enricher only needs "title/year in, poster artwork out", so the
/// metadata API sits behind this trait. Swapping the backing API (or stubbing
/// it in tests) touches nothing else.
use crate::{error::AppResult, models::PosterInfo};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for poster metadata providers
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Look up poster artwork for a title/year pair
    ///
    /// Returns `PosterInfo { url: None }` when the provider has no usable
    /// artwork for the title; errors are reserved for failed calls.
    async fn lookup_poster(&self, title: &str, year: &str) -> AppResult<PosterInfo>;

    /// Clone provider for parallel task execution
    ///
    /// Required because providers need to be moved into tokio tasks.
    fn clone_for_task(&self) -> Box<dyn PosterProvider>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
