// Core of ghsearch: models, configuration and the fetch collaborators
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod providers;
pub mod trending;

pub use config::{resolve_token, Config, SearchSettings, TrendSettings};
pub use error::Error;
pub use fetch::PageFetcher;
pub use models::{
    Browsable, CodeMatch, DateRange, DetailField, Repository, SearchKind, TrendingLanguage,
    TrendingRepository,
};
pub use trending::{fetch_all_ranges, RangeFetcher, LAUNCH_STAGGER};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
