pub mod manager;
pub mod types;

pub use manager::{ConfigError, ConfigManager};
pub use types::{BotSettings, GitHubAuth, GitHubSettings, NuggetConfig, ServerSettings};
