// Trending provider - scrapes the trending page for one date range
use async_trait::async_trait;
use ghsearch_api::{TrendingClient, TrendingEntry};

use crate::{
    config::TrendSettings,
    models::{DateRange, TrendingRepository},
    trending::RangeFetcher,
    Result,
};

pub struct TrendingSource {
    client: TrendingClient,
    language: String,
    spoken_language: String,
}

impl TrendingSource {
    pub fn new(settings: &TrendSettings) -> Result<Self> {
        Ok(Self {
            client: TrendingClient::with_base_url(settings.web_url.clone())?,
            language: settings.language.clone(),
            spoken_language: settings.spoken_language.clone(),
        })
    }

    /// Trending repositories for one period, in page order
    pub async fn fetch(&self, range: DateRange) -> Result<Vec<TrendingRepository>> {
        let entries = self
            .client
            .fetch(&self.language, range.as_param(), &self.spoken_language)
            .await?;

        Ok(entries.into_iter().map(entry_to_repo).collect())
    }
}

#[async_trait]
impl RangeFetcher<TrendingRepository> for TrendingSource {
    async fn fetch_range(&self, range: DateRange) -> Result<Vec<TrendingRepository>> {
        self.fetch(range).await
    }
}

fn entry_to_repo(entry: TrendingEntry) -> TrendingRepository {
    TrendingRepository {
        author: entry.author,
        name: entry.name,
        link: entry.link,
        description: entry.description,
        language: entry.language,
        stars: entry.stars,
        forks: entry.forks,
        stars_gained: entry.added,
        built_by: entry.built_by,
    }
}
