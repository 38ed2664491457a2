pub mod enrich;
pub mod providers;
pub mod watchlist;

pub use enrich::Enricher;
pub use watchlist::Watchlist;
