use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Envelope shared by every `/search/*` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLicense {
    pub key: String,
    pub name: String,
}

/// Repository item as returned by `/search/repositories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: GitHubOwner,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<GitHubLicense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub score: f64,
}

/// Minimal repository info attached to a code search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCodeRepository {
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
}

/// File item as returned by `/search/code`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCodeItem {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub html_url: String,
    pub repository: GitHubCodeRepository,
    #[serde(default)]
    pub score: f64,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local mock server
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "ghsearch/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search repositories, best match ordering requested by stars
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GitHubRepo>> {
        let url = format!("{}/search/repositories", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let response: SearchResponse<GitHubRepo> = self.get_json(&url, &params).await?;
        debug!(
            "repository search '{}' page {}: {} of {} items",
            query,
            page,
            response.items.len(),
            response.total_count
        );
        Ok(response.items)
    }

    /// Search code across public repositories
    pub async fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GitHubCodeItem>> {
        let url = format!("{}/search/code", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("order", "desc".to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let response: SearchResponse<GitHubCodeItem> = self.get_json(&url, &params).await?;
        debug!(
            "code search '{}' page {}: {} of {} items",
            query,
            page,
            response.items.len(),
            response.total_count
        );
        Ok(response.items)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(url).query(params);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GitHubError::AuthRequired);
        }

        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RateLimited(body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Build the `q` parameter: `language:<lang>` followed by the keywords
pub fn build_query(language: &str, keywords: &[String]) -> String {
    let mut parts = Vec::with_capacity(keywords.len() + 1);

    if !language.is_empty() {
        parts.push(format!("language:{}", language));
    }
    parts.extend(keywords.iter().filter(|k| !k.is_empty()).cloned());

    parts.join(" ")
}
