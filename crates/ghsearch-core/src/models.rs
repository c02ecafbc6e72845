use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum characters of a description shown in a one-line summary
pub const SUMMARY_DESC_CHARS: usize = 16;

/// A labelled value rendered in the detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Anything the browse session can list, inspect and open.
///
/// The session treats rows as opaque: it only ever asks for these three
/// things and never reorders them.
pub trait Browsable {
    /// One-line label for the result list (without the rank number)
    fn summary(&self) -> String;

    /// Fields for the detail pane, in display order
    fn details(&self) -> Vec<DetailField>;

    /// Canonical URL handed to the browser
    fn url(&self) -> &str;
}

/// Cut `text` to `max` characters, appending `...` when something was dropped
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Format large numbers with commas
pub fn format_number(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Repository search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub homepage_url: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
    pub default_branch: String,
    pub is_archived: bool,
    pub is_fork: bool,
}

impl Browsable for Repository {
    fn summary(&self) -> String {
        let desc = self.description.as_deref().unwrap_or_default();
        format!(
            "⭐{:<6} {}  {}  {}",
            self.stars,
            self.full_name,
            self.pushed_at.format("%Y-%m-%d"),
            truncate_chars(desc, SUMMARY_DESC_CHARS)
        )
    }

    fn details(&self) -> Vec<DetailField> {
        let mut fields = vec![
            DetailField::new("Repository", &self.full_name),
            DetailField::new(
                "Description",
                self.description.as_deref().unwrap_or("No description"),
            ),
            DetailField::new("Stars", format_number(self.stars)),
            DetailField::new("Forks", format_number(self.forks)),
            DetailField::new("Watchers", format_number(self.watchers)),
            DetailField::new("Open issues", format_number(self.open_issues)),
            DetailField::new(
                "Language",
                self.language.as_deref().unwrap_or("Unknown"),
            ),
            DetailField::new("License", self.license.as_deref().unwrap_or("None")),
            DetailField::new("Default branch", &self.default_branch),
            DetailField::new("Created", self.created_at.format("%Y-%m-%d").to_string()),
            DetailField::new("Last push", self.pushed_at.format("%Y-%m-%d").to_string()),
        ];

        if !self.topics.is_empty() {
            fields.push(DetailField::new("Topics", self.topics.join(", ")));
        }
        if let Some(homepage) = self.homepage_url.as_deref().filter(|h| !h.is_empty()) {
            fields.push(DetailField::new("Homepage", homepage));
        }
        if self.is_archived {
            fields.push(DetailField::new("Status", "archived"));
        } else if self.is_fork {
            fields.push(DetailField::new("Status", "fork"));
        }
        fields.push(DetailField::new("URL", &self.url));

        fields
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Code search hit - one file in one repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeMatch {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub url: String,
    pub repository: String,
    pub repository_url: String,
    pub repository_description: Option<String>,
    pub score: f64,
}

impl Browsable for CodeMatch {
    fn summary(&self) -> String {
        format!("{}  {}", self.repository, self.path)
    }

    fn details(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("File", &self.name),
            DetailField::new("Path", &self.path),
            DetailField::new("Repository", &self.repository),
            DetailField::new(
                "Description",
                self.repository_description
                    .as_deref()
                    .unwrap_or("No description"),
            ),
            DetailField::new("Score", format!("{:.2}", self.score)),
            DetailField::new("SHA", &self.sha),
            DetailField::new("URL", &self.url),
        ]
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Entry scraped from the trending page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingRepository {
    pub author: String,
    pub name: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub forks: u32,
    pub stars_gained: u32,
    pub built_by: Vec<String>,
}

impl Browsable for TrendingRepository {
    fn summary(&self) -> String {
        format!(
            "⭐{:<6} {}/{}  {}",
            self.stars,
            self.author,
            self.name,
            truncate_chars(&self.description, SUMMARY_DESC_CHARS)
        )
    }

    fn details(&self) -> Vec<DetailField> {
        let description = if self.description.is_empty() {
            "No description"
        } else {
            &self.description
        };

        vec![
            DetailField::new("Repository", format!("{}/{}", self.author, self.name)),
            DetailField::new("Description", description),
            DetailField::new("Language", &self.language),
            DetailField::new("Stars", format_number(self.stars)),
            DetailField::new("Forks", format_number(self.forks)),
            DetailField::new("Gained", format!("+{}", format_number(self.stars_gained))),
            DetailField::new("Built by", self.built_by.len().to_string()),
            DetailField::new("URL", &self.link),
        ]
    }

    fn url(&self) -> &str {
        &self.link
    }
}

/// One entry of the language picker shown before trending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingLanguage {
    pub name: String,
    /// Trending page of this language
    pub link: String,
}

impl TrendingLanguage {
    pub fn new(web_url: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            link: ghsearch_api::trending_url(web_url, &name),
            name,
        }
    }
}

impl Browsable for TrendingLanguage {
    fn summary(&self) -> String {
        if self.name.is_empty() {
            "all languages".to_string()
        } else {
            self.name.clone()
        }
    }

    fn details(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Language", self.summary()),
            DetailField::new("Trending page", &self.link),
        ]
    }

    fn url(&self) -> &str {
        &self.link
    }
}

/// What `search` looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Repositories,
    Code,
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Repositories => write!(f, "repositories"),
            SearchKind::Code => write!(f, "code"),
        }
    }
}

/// Period covered by the trending page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Daily,
    Weekly,
    Monthly,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [DateRange::Daily, DateRange::Weekly, DateRange::Monthly];

    /// Value of the `since` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            DateRange::Daily => "daily",
            DateRange::Weekly => "weekly",
            DateRange::Monthly => "monthly",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DateRange::Daily => "Today",
            DateRange::Weekly => "This week",
            DateRange::Monthly => "This month",
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(DateRange::Daily),
            "weekly" | "week" => Ok(DateRange::Weekly),
            "monthly" | "month" => Ok(DateRange::Monthly),
            other => Err(crate::Error::ConfigError(format!(
                "unknown date range '{}', expected daily, weekly or monthly",
                other
            ))),
        }
    }
}
