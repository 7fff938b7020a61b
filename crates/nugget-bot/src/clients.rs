//! Per-event GitHub clients
//!
//! A token deployment shares one client across events. A GitHub App mints
//! a short-lived installation token for every delivery.

use crate::error::{BotError, Result};
use async_trait::async_trait;
use nugget_config::{ConfigError, GitHubAuth, NuggetConfig};
use nugget_github::{AppCredentials, BotIdentity, GitHubApp, GitHubClient, HttpClient, PullRequestApi};
use std::sync::Arc;
use tracing::info;

/// Hands out a [`PullRequestApi`] for a webhook delivery
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Client acting for `installation_id` (ignored outside app mode)
    async fn client(&self, installation_id: Option<u64>) -> Result<Arc<dyn PullRequestApi>>;
}

/// One token, one client
pub struct TokenClients {
    client: Arc<GitHubClient>,
}

impl TokenClients {
    /// Share `client` across every installation
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl ClientProvider for TokenClients {
    async fn client(&self, _installation_id: Option<u64>) -> Result<Arc<dyn PullRequestApi>> {
        Ok(self.client.clone())
    }
}

/// GitHub App installations
pub struct AppClients {
    app: GitHubApp,
    identity: BotIdentity,
}

impl AppClients {
    /// Resolve the app's `<slug>[bot]` identity and wrap it
    pub async fn new(app: GitHubApp) -> Result<Self> {
        let info = app.app_info().await?;
        info!(app_id = info.id, slug = %info.slug, "authenticated as GitHub App");
        Ok(Self {
            identity: BotIdentity::app(&info.slug),
            app,
        })
    }
}

#[async_trait]
impl ClientProvider for AppClients {
    async fn client(&self, installation_id: Option<u64>) -> Result<Arc<dyn PullRequestApi>> {
        let installation_id = installation_id
            .ok_or(BotError::MissingInstallation)?;
        let client = self
            .app
            .installation_client(installation_id, self.identity.clone())
            .await?;
        Ok(Arc::new(client))
    }
}

/// Build the provider matching the configured authentication mode
pub async fn from_config(config: &NuggetConfig) -> Result<Arc<dyn ClientProvider>> {
    let github = &config.github;
    let http = HttpClient::with_rate_limit(github.requests_per_second)?;

    match github.auth()? {
        GitHubAuth::Token(token) => {
            info!(api_url = %github.api_url, "using token authentication");
            let client = GitHubClient::new(http, &github.api_url, token)?;
            Ok(Arc::new(TokenClients::new(client)))
        }
        GitHubAuth::App {
            app_id,
            private_key_path,
        } => {
            let pem = tokio::fs::read(&private_key_path)
                .await
                .map_err(ConfigError::Io)?;
            let credentials = AppCredentials::from_pem(app_id, &pem)?;
            let app = GitHubApp::new(http, &github.api_url, credentials)?;
            Ok(Arc::new(AppClients::new(app).await?))
        }
    }
}
