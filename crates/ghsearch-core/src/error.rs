use thiserror::Error;

/// All the ways a search or trending fetch can fail
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ghsearch_api::GitHubError> for Error {
    fn from(err: ghsearch_api::GitHubError) -> Self {
        use ghsearch_api::GitHubError;

        match err {
            GitHubError::AuthRequired => {
                Error::AuthError("GitHub rejected the token (401)".to_string())
            }
            GitHubError::RateLimited(body) => Error::RateLimitExceeded(body),
            GitHubError::ParseError(e) => Error::SerializationError(e),
            other => Error::ApiError(other.to_string()),
        }
    }
}
