// GitHub search providers - bridge the API client with PageFetcher
use async_trait::async_trait;
use ghsearch_api::{GitHubClient, GitHubCodeItem, GitHubRepo};
use tracing::debug;

use crate::{
    config::SearchSettings,
    fetch::PageFetcher,
    models::{CodeMatch, Repository},
    Result,
};

/// Repository search for a fixed query, ranked by stars
pub struct RepositorySearch {
    client: GitHubClient,
    query: String,
    per_page: u32,
}

impl RepositorySearch {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::with_base_url(
                Some(settings.token.clone()),
                settings.api_url.clone(),
            )?,
            query: settings.query(),
            per_page: settings.per_page,
        })
    }
}

#[async_trait]
impl PageFetcher<Repository> for RepositorySearch {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Repository>> {
        debug!("fetching repositories '{}' page {}", self.query, page);
        let repos = self
            .client
            .search_repositories(&self.query, page, self.per_page)
            .await?;

        Ok(rank_repositories(
            repos.into_iter().map(github_to_repo).collect(),
        ))
    }
}

/// Code search for a fixed query, ranked by score
pub struct CodeSearch {
    client: GitHubClient,
    query: String,
    per_page: u32,
}

impl CodeSearch {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::with_base_url(
                Some(settings.token.clone()),
                settings.api_url.clone(),
            )?,
            query: settings.query(),
            per_page: settings.per_page,
        })
    }
}

#[async_trait]
impl PageFetcher<CodeMatch> for CodeSearch {
    async fn fetch_page(&self, page: u32) -> Result<Vec<CodeMatch>> {
        debug!("fetching code '{}' page {}", self.query, page);
        let items = self
            .client
            .search_code(&self.query, page, self.per_page)
            .await?;

        Ok(rank_code_matches(
            items.into_iter().map(github_to_code_match).collect(),
        ))
    }
}

/// Most starred first; ties keep API order
pub fn rank_repositories(mut repos: Vec<Repository>) -> Vec<Repository> {
    repos.sort_by(|a, b| b.stars.cmp(&a.stars));
    repos
}

/// Highest score first; ties keep API order
pub fn rank_code_matches(mut matches: Vec<CodeMatch>) -> Vec<CodeMatch> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Convert GitHub API repo to our internal Repository model
fn github_to_repo(gh: GitHubRepo) -> Repository {
    Repository {
        full_name: gh.full_name,
        description: gh.description,
        url: gh.html_url,
        homepage_url: gh.homepage,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        watchers: gh.watchers_count,
        open_issues: gh.open_issues_count,
        language: gh.language,
        topics: gh.topics,
        license: gh.license.map(|l| l.name),
        created_at: gh.created_at,
        updated_at: gh.updated_at,
        pushed_at: gh.pushed_at.unwrap_or(gh.updated_at),
        default_branch: gh.default_branch,
        is_archived: gh.archived,
        is_fork: gh.fork,
    }
}

fn github_to_code_match(item: GitHubCodeItem) -> CodeMatch {
    CodeMatch {
        name: item.name,
        path: item.path,
        sha: item.sha,
        url: item.html_url,
        repository: item.repository.full_name,
        repository_url: item.repository.html_url,
        repository_description: item.repository.description,
        score: item.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn repo(name: &str, stars: u32) -> Repository {
        Repository {
            full_name: name.to_string(),
            description: None,
            url: format!("https://github.com/{}", name),
            homepage_url: None,
            stars,
            forks: 0,
            watchers: 0,
            open_issues: 0,
            language: Some("Go".to_string()),
            topics: vec![],
            license: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            pushed_at: Utc::now(),
            default_branch: "main".to_string(),
            is_archived: false,
            is_fork: false,
        }
    }

    fn code(path: &str, score: f64) -> CodeMatch {
        CodeMatch {
            name: path.to_string(),
            path: path.to_string(),
            sha: "0".to_string(),
            url: String::new(),
            repository: "a/b".to_string(),
            repository_url: String::new(),
            repository_description: None,
            score,
        }
    }

    #[test]
    fn test_repositories_ranked_by_stars() {
        let ranked = rank_repositories(vec![repo("c", 100), repo("a", 500), repo("b", 300)]);
        let names: Vec<_> = ranked.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let ranked = rank_repositories(vec![repo("first", 10), repo("second", 10)]);
        assert_eq!(ranked[0].full_name, "first");
        assert_eq!(ranked[1].full_name, "second");
    }

    #[test]
    fn test_code_ranked_by_score() {
        let ranked = rank_code_matches(vec![code("low", 0.5), code("high", 9.0), code("mid", 2.0)]);
        let paths: Vec<_> = ranked.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["high", "mid", "low"]);
    }
}
