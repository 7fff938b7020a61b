use crate::manager::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for nugget
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NuggetConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// GitHub API access
    #[serde(default)]
    pub github: GitHubSettings,

    /// Lockfile detection settings
    #[serde(default)]
    pub bot: BotSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// Secret used to verify webhook signatures; unsigned deliveries are
    /// accepted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_secret: None,
        }
    }
}

/// GitHub API access
///
/// Exactly one of `token` or `app_id` + `private_key_path` must be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubSettings {
    /// REST API root, override for GitHub Enterprise
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// GitHub App ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,

    /// Path to the GitHub App's PEM private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    /// Client-side request budget, 0 disables limiting
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl GitHubSettings {
    /// Resolve which authentication mode is configured
    pub fn auth(&self) -> Result<GitHubAuth, ConfigError> {
        match (&self.token, self.app_id, &self.private_key_path) {
            (Some(_), Some(_), _) => Err(ConfigError::Invalid(
                "github.token and github.app_id are mutually exclusive".into(),
            )),
            (Some(token), None, _) => Ok(GitHubAuth::Token(token.clone())),
            (None, Some(app_id), Some(path)) => Ok(GitHubAuth::App {
                app_id,
                private_key_path: path.clone(),
            }),
            (None, Some(_), None) => Err(ConfigError::Invalid(
                "github.app_id requires github.private_key_path".into(),
            )),
            (None, None, _) => Err(ConfigError::Invalid(
                "either github.token or github.app_id must be set".into(),
            )),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            app_id: None,
            private_key_path: None,
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// How to authenticate against GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubAuth {
    /// Personal access token
    Token(String),
    /// GitHub App credentials
    App {
        /// App ID
        app_id: u64,
        /// PEM private key location
        private_key_path: PathBuf,
    },
}

/// Lockfile detection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotSettings {
    /// Lockfile path relative to the repository root
    #[serde(default = "default_lockfile_path")]
    pub lockfile_path: String,

    /// Files requested per page when listing pull request files
    #[serde(default = "default_files_per_page")]
    pub files_per_page: u32,

    /// Pages to scan before giving up; GitHub lists at most 3000 files
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl BotSettings {
    /// Most files the locator can inspect
    pub fn file_limit(&self) -> u64 {
        u64::from(self.files_per_page) * u64::from(self.max_pages)
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            lockfile_path: default_lockfile_path(),
            files_per_page: default_files_per_page(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_lockfile_path() -> String {
    "yarn.lock".to_string()
}

fn default_files_per_page() -> u32 {
    50
}

fn default_max_pages() -> u32 {
    60
}
