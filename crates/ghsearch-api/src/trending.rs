// GitHub trending page scraper
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::github::{GitHubError, Result};

pub const GITHUB_WEB_BASE: &str = "https://github.com";

/// One row of the trending page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    pub author: String,
    pub name: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub forks: u32,
    /// Stars gained during the requested period
    pub added: u32,
    /// Avatar URLs of the top contributors
    pub built_by: Vec<String>,
}

pub struct TrendingClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrendingClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_WEB_BASE.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ghsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and scrape the trending page.
    ///
    /// `language` is the path segment (`go`, `c++`, empty for all languages),
    /// `since` one of `daily`/`weekly`/`monthly`, `spoken` a spoken language
    /// code or empty for any.
    pub async fn fetch(
        &self,
        language: &str,
        since: &str,
        spoken: &str,
    ) -> Result<Vec<TrendingEntry>> {
        let url = trending_url(&self.base_url, language);

        let response = self
            .client
            .get(&url)
            .query(&[("spoken_language_code", spoken), ("since", since)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let html = response.text().await?;
        let entries = parse_trending(&html, &self.base_url);
        debug!("trending {} {}: {} entries", url, since, entries.len());
        Ok(entries)
    }
}

/// Trending page for `language` under `base_url`; empty means all languages
pub fn trending_url(base_url: &str, language: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if language.is_empty() {
        format!("{}/trending", base)
    } else {
        format!("{}/trending/{}", base, urlencoding::encode(language))
    }
}

struct Selectors {
    row: Selector,
    title: Selector,
    span: Selector,
    description: Selector,
    meta_span: Selector,
    meta_link: Selector,
    avatar: Selector,
}

impl Selectors {
    fn new() -> Self {
        // Static selector strings; parse cannot fail on them.
        let parse = |s: &str| Selector::parse(s).unwrap_or_else(|_| unreachable!("selector {s}"));
        Self {
            row: parse(".Box .Box-row"),
            title: parse("h1 a, h2 a"),
            span: parse("span"),
            description: parse("p"),
            meta_span: parse("div > span"),
            meta_link: parse("div > a"),
            avatar: parse("a > img"),
        }
    }
}

/// Scrape trending entries out of a trending page, in page order
pub fn parse_trending(html: &str, base_url: &str) -> Vec<TrendingEntry> {
    let document = Html::parse_document(html);
    let selectors = Selectors::new();

    document
        .select(&selectors.row)
        .map(|row| parse_row(row, &selectors, base_url))
        .collect()
}

fn parse_row(row: ElementRef<'_>, sel: &Selectors, base_url: &str) -> TrendingEntry {
    let mut entry = TrendingEntry {
        author: String::new(),
        name: String::new(),
        link: String::new(),
        description: String::new(),
        language: String::new(),
        stars: 0,
        forks: 0,
        added: 0,
        built_by: Vec::new(),
    };

    if let Some(title) = row.select(&sel.title).next() {
        if let Some(span) = title.select(&sel.span).next() {
            entry.author = text_of(span)
                .trim_matches(|c| c == '/' || c == '\n' || c == ' ')
                .to_string();
        }
        entry.name = title
            .text()
            .last()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        if let Some(href) = title.value().attr("href").filter(|h| !h.is_empty()) {
            entry.link = format!("{}{}", base_url, href);
        }
    }

    entry.description = row
        .select(&sel.description)
        .next()
        .map(|p| text_of(p).trim().to_string())
        .unwrap_or_default();

    let spans: Vec<ElementRef<'_>> = row.select(&sel.meta_span).collect();
    // Two spans means the language badge is missing.
    let (lang_idx, built_by_idx, added_idx) = if spans.len() == 2 {
        (None, 0, 1)
    } else {
        (Some(0), 1, 2)
    };

    entry.language = lang_idx
        .and_then(|i| spans.get(i))
        .map(|s| text_of(*s).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    entry.added = spans
        .get(added_idx)
        .map(|s| leading_number(&text_of(*s)))
        .unwrap_or(0);

    if let Some(span) = spans.get(built_by_idx) {
        entry.built_by = span
            .select(&sel.avatar)
            .filter_map(|img| img.value().attr("src"))
            .map(str::to_string)
            .collect();
    }

    let links: Vec<ElementRef<'_>> = row.select(&sel.meta_link).collect();
    if links.len() >= 2 {
        entry.stars = parse_count(&text_of(links[links.len() - 2]));
        entry.forks = parse_count(&text_of(links[links.len() - 1]));
    } else if let Some(last) = links.last() {
        entry.forks = parse_count(&text_of(*last));
    }

    entry
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn parse_count(text: &str) -> u32 {
    text.trim().replace(',', "").parse().unwrap_or(0)
}

fn leading_number(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .map(parse_count)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_trending_url() {
        assert_eq!(trending_url("https://github.com/", ""), "https://github.com/trending");
        assert_eq!(
            trending_url("https://github.com", "c++"),
            "https://github.com/trending/c%2B%2B"
        );
    }

    const PAGE: &str = r#"
<html><body>
<div class="Box">
  <div class="Box-row">
    <h2 class="h3 lh-condensed">
      <a href="/tokio-rs/tokio">
        <span class="text-normal">tokio-rs /</span>
        tokio</a>
    </h2>
    <p class="col-9">
      A runtime for writing reliable asynchronous applications
    </p>
    <div class="f6 color-fg-muted mt-2">
      <span class="d-inline-block ml-0 mr-3"><span itemprop="programmingLanguage">Rust</span></span>
      <a href="/tokio-rs/tokio/stargazers"> 25,123</a>
      <a href="/tokio-rs/tokio/forks"> 2,301</a>
      <span class="d-inline-block mr-3">Built by
        <a href="/carllerche"><img class="avatar" src="https://avatars.example/carllerche.png"></a>
        <a href="/Darksonn"><img class="avatar" src="https://avatars.example/darksonn.png"></a>
      </span>
      <span class="d-inline-block float-sm-right">1,142 stars today</span>
    </div>
  </div>
  <div class="Box-row">
    <h1 class="h3 lh-condensed">
      <a href="/someone/notes">
        <span class="text-normal">someone /</span>
        notes</a>
    </h1>
    <div class="f6 color-fg-muted mt-2">
      <a href="/someone/notes/stargazers">812</a>
      <a href="/someone/notes/forks">40</a>
      <span class="d-inline-block mr-3">Built by</span>
      <span class="d-inline-block float-sm-right">57 stars today</span>
    </div>
  </div>
</div>
</body></html>
"#;

    #[test]
    fn test_parse_row_with_language() {
        let entries = parse_trending(PAGE, GITHUB_WEB_BASE);
        assert_eq!(entries.len(), 2);

        let tokio = &entries[0];
        assert_eq!(tokio.author, "tokio-rs");
        assert_eq!(tokio.name, "tokio");
        assert_eq!(tokio.link, "https://github.com/tokio-rs/tokio");
        assert_eq!(
            tokio.description,
            "A runtime for writing reliable asynchronous applications"
        );
        assert_eq!(tokio.language, "Rust");
        assert_eq!(tokio.stars, 25_123);
        assert_eq!(tokio.forks, 2_301);
        assert_eq!(tokio.added, 1_142);
        assert_eq!(
            tokio.built_by,
            vec![
                "https://avatars.example/carllerche.png".to_string(),
                "https://avatars.example/darksonn.png".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_row_without_language() {
        let entries = parse_trending(PAGE, GITHUB_WEB_BASE);
        let notes = &entries[1];

        assert_eq!(notes.author, "someone");
        assert_eq!(notes.name, "notes");
        assert_eq!(notes.language, "unknown");
        assert_eq!(notes.description, "");
        assert_eq!(notes.stars, 812);
        assert_eq!(notes.forks, 40);
        assert_eq!(notes.added, 57);
        assert!(notes.built_by.is_empty());
    }

    #[test]
    fn test_page_without_rows() {
        assert!(parse_trending("<html><body><p>nothing</p></body></html>", "").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_builds_trending_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/c%2B%2B"))
            .and(query_param("since", "weekly"))
            .and(query_param("spoken_language_code", "zh"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let client = TrendingClient::with_base_url(server.uri()).unwrap();
        let entries = client.fetch("c++", "weekly", "zh").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link, format!("{}/tokio-rs/tokio", server.uri()));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = TrendingClient::with_base_url(server.uri()).unwrap();
        let err = client.fetch("go", "daily", "").await.unwrap_err();

        assert!(matches!(err, GitHubError::RequestFailed(_)));
    }
}
