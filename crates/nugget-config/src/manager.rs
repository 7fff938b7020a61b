use crate::types::{GitHubAuth, NuggetConfig};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Environment variables consulted by [`ConfigManager::apply_env`]
pub const ENV_HOST: &str = "NUGGET_HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_WEBHOOK_SECRET: &str = "NUGGET_WEBHOOK_SECRET";
pub const ENV_API_URL: &str = "GITHUB_API_URL";
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_APP_ID: &str = "GITHUB_APP_ID";
pub const ENV_PRIVATE_KEY_PATH: &str = "GITHUB_PRIVATE_KEY_PATH";

/// Loader for nugget configuration
///
/// Settings come from an optional `nugget.toml`, then environment
/// variables, then are validated once before the server starts.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    config: NuggetConfig,
}

impl ConfigManager {
    /// Load config from the given file, or defaults when `path` is `None`,
    /// then apply process environment overrides and validate
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = match path {
            Some(path) => Self::load_from(path).await?,
            None => Self::default(),
        };
        manager.apply_env(|name| std::env::var(name).ok())?;
        manager.validate()?;
        Ok(manager)
    }

    /// Load config from specific path without env overrides (useful for testing)
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: NuggetConfig = toml::from_str(&contents)?;

        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Wrap an already-built config
    pub fn from_config(config: NuggetConfig) -> Self {
        Self {
            config_path: None,
            config,
        }
    }

    /// Overlay environment variables read through `lookup`
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let config = &mut self.config;

        if let Some(host) = get(ENV_HOST) {
            config.server.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PORT,
                value: port,
            })?;
        }
        if let Some(secret) = get(ENV_WEBHOOK_SECRET) {
            config.server.webhook_secret = Some(secret);
        }
        if let Some(api_url) = get(ENV_API_URL) {
            config.github.api_url = api_url;
        }
        if let Some(token) = get(ENV_TOKEN) {
            config.github.token = Some(token);
        }
        if let Some(app_id) = get(ENV_APP_ID) {
            let parsed = app_id.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_APP_ID,
                value: app_id,
            })?;
            config.github.app_id = Some(parsed);
        }
        if let Some(key_path) = get(ENV_PRIVATE_KEY_PATH) {
            config.github.private_key_path = Some(PathBuf::from(key_path));
        }

        Ok(())
    }

    /// Check that the settings describe a runnable bot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.github_auth()?;

        let bot = &self.config.bot;
        if bot.lockfile_path.trim().is_empty() {
            return Err(ConfigError::Invalid("bot.lockfile_path is empty".into()));
        }
        if bot.files_per_page == 0 || bot.files_per_page > 100 {
            return Err(ConfigError::Invalid(format!(
                "bot.files_per_page must be between 1 and 100, got {}",
                bot.files_per_page
            )));
        }
        if bot.max_pages == 0 {
            return Err(ConfigError::Invalid("bot.max_pages must be positive".into()));
        }

        Ok(())
    }

    /// Resolve which GitHub authentication mode is configured
    pub fn github_auth(&self) -> Result<GitHubAuth, ConfigError> {
        self.config.github.auth()
    }

    /// Path the config was read from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Get reference to config
    pub fn config(&self) -> &NuggetConfig {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut NuggetConfig {
        &mut self.config
    }

    /// Consume the manager, returning the config
    pub fn into_config(self) -> NuggetConfig {
        self.config
    }
}
