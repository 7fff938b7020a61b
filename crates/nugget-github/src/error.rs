//! Error types for nugget-github

use thiserror::Error;

/// Result type alias for nugget-github operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nugget-github operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// File contents were not valid base64
    #[error("Invalid base64 file content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// GitHub App JWT could not be created
    #[error("GitHub App authentication failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (HTTP 429, or 403 with an exhausted quota)
    #[error("Rate limit exceeded for URL: {0}")]
    RateLimitExceeded(String),

    /// GitHub API returned an unexpected status
    #[error("GitHub API error ({status}): {message}")]
    GitHubApi {
        /// HTTP status code
        status: u16,
        /// Message from the response body, or the URL when there is none
        message: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error means the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
