//! Error types for the bot

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Errors that abort handling of a pull request event
#[derive(Debug, Error)]
pub enum BotError {
    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHub(#[from] nugget_github::Error),

    /// A lockfile could not be decoded or parsed
    #[error("lockfile error: {0}")]
    Lockfile(#[from] nugget_lockfile::Error),

    /// Configuration was unusable
    #[error("configuration error: {0}")]
    Config(#[from] nugget_config::ConfigError),

    /// Webhook body did not match the expected payload shape
    #[error("invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// App-mode event arrived without an installation
    #[error("webhook delivery carries no installation id")]
    MissingInstallation,
}
