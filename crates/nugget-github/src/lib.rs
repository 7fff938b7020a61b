//! GitHub REST client for the nugget pull request bot
//!
//! This library provides the few GitHub operations the bot needs: listing a
//! pull request's changed files, reading a file at a ref, and managing the
//! bot's comment on the pull request conversation.
//!
//! Two ways of authenticating are supported:
//! - a plain token (personal access token), via [`GitHubClient::new`]
//! - a GitHub App, via [`GitHubApp::installation_client`]
//!
//! # Example
//!
//! ```no_run
//! use nugget_github::{GitHubClient, HttpClient, PullRequestApi, Repository, GITHUB_API_URL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::new(HttpClient::new()?, GITHUB_API_URL, "ghp_token")?;
//!     let repo = Repository::new("octo", "app");
//!
//!     let files = client.list_pull_request_files(&repo, 42, 1, 50).await?;
//!     println!("{} files changed", files.len());
//!     Ok(())
//! }
//! ```

mod api;
mod auth;
mod client;
mod error;
mod github;
mod types;

pub use api::PullRequestApi;
pub use auth::AppCredentials;
pub use client::HttpClient;
pub use error::{Error, Result};
pub use github::{GitHubApp, GitHubClient, GITHUB_API_URL};
pub use types::{
    AppInfo, BotIdentity, InstallationToken, IssueComment, PullRequestFile, Repository, User,
};
