use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::SearchKind;

/// Main configuration structure
///
/// Loaded from `config.toml`; command line flags and `GITHUB_TOKEN` override
/// what is read here when the settings structs are built.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path; a missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            crate::Error::ConfigError(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Get the config file path (XDG on Linux, Application Support on macOS, AppData on Windows)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?;

        Ok(config_dir.join("ghsearch").join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token, used when neither --token nor GITHUB_TOKEN is set
    pub token: Option<String>,

    /// REST API URL (for GitHub Enterprise)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Web URL the trending page is scraped from
    #[serde(default = "default_web_url")]
    pub web_url: String,
}

fn default_api_url() -> String {
    ghsearch_api::GITHUB_API_BASE.to_string()
}

fn default_web_url() -> String {
    ghsearch_api::GITHUB_WEB_BASE.to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            web_url: default_web_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Language qualifier used when --lang is not given
    #[serde(default = "default_language")]
    pub language: String,

    /// Results per page requested from the API
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_language() -> String {
    "go".to_string()
}

fn default_per_page() -> u32 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    /// Languages offered by the picker; an empty entry means all languages
    #[serde(default = "default_trending_languages")]
    pub languages: Vec<String>,

    /// Spoken language code (zh, en, de, ...); empty means any
    #[serde(default)]
    pub spoken_language: String,
}

fn default_trending_languages() -> Vec<String> {
    ["go", "rust", "c", "c++", "java", "c#", "js"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            languages: default_trending_languages(),
            spoken_language: String::new(),
        }
    }
}

/// Pick the API token: flag (or GITHUB_TOKEN via clap), then the config file
pub fn resolve_token(flag: Option<String>, file: Option<String>) -> crate::Result<String> {
    flag.filter(|t| !t.trim().is_empty())
        .or_else(|| file.filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| {
            crate::Error::ConfigError(
                "token is empty. please set env GITHUB_TOKEN or use --token=xx".to_string(),
            )
        })
}

/// Everything a search command needs, fixed before any request is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub token: String,
    pub api_url: String,
    pub language: String,
    pub keywords: Vec<String>,
    pub kind: SearchKind,
    pub page: u32,
    pub per_page: u32,
}

impl SearchSettings {
    /// The `q` parameter sent to the search endpoint
    pub fn query(&self) -> String {
        ghsearch_api::build_query(&self.language, &self.keywords)
    }

    /// Human readable label, e.g. `lang:go grpc`
    pub fn label(&self) -> String {
        let mut parts = vec![format!("lang:{}", self.language)];
        parts.extend(self.keywords.iter().cloned());
        parts.join(" ")
    }
}

/// Everything a trending command needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSettings {
    pub web_url: String,
    pub language: String,
    pub spoken_language: String,
}
