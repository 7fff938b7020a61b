//! # nugget-bot
//!
//! GitHub pull request bot reporting `yarn.lock` package version changes.
//!
//! For every opened or updated pull request the bot:
//! 1. pages through the changed files looking for the lockfile ([`locate_lockfile`])
//! 2. fetches the lockfile at the base branch and the head commit
//! 3. diffs the two with [`nugget_lockfile::diff_lockfiles`]
//! 4. keeps a single bot comment on the pull request up to date ([`CommentPublisher`])
//!
//! [`server::router`] exposes this over HTTP as a GitHub webhook receiver.

#![warn(missing_docs)]

pub mod clients;
pub mod composer;
pub mod error;
pub mod handler;
pub mod locator;
pub mod server;
pub mod webhook;

#[cfg(test)]
mod testing;

pub use clients::{AppClients, ClientProvider, TokenClients};
pub use composer::{
    render_diff_comment, render_too_many_files_comment, CommentPublisher, PublishAction,
};
pub use error::{BotError, Result};
pub use handler::{handle_pull_request, Outcome, PullRequestEvent};
pub use locator::{locate_lockfile, LockfileStatus};
pub use server::{router, serve, AppState};
