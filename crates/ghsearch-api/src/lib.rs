// GitHub search API client and trending page scraper
pub mod github;
pub mod trending;

// Re-export common types
pub use github::{
    build_query, GitHubClient, GitHubCodeItem, GitHubError, GitHubRepo, SearchResponse,
    GITHUB_API_BASE,
};
pub use trending::{parse_trending, trending_url, TrendingClient, TrendingEntry, GITHUB_WEB_BASE};
