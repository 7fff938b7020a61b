//! The pull request operations the bot needs from a code host

use crate::error::Result;
use crate::types::{BotIdentity, IssueComment, PullRequestFile, Repository};

/// Pull request and comment operations
///
/// [`crate::GitHubClient`] implements this against the GitHub REST API;
/// tests substitute an in-memory implementation.
#[async_trait::async_trait]
pub trait PullRequestApi: Send + Sync {
    /// List one page of the files changed by a pull request
    ///
    /// Pages are 1-based. An empty page means the listing is exhausted.
    async fn list_pull_request_files(
        &self,
        repo: &Repository,
        number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestFile>>;

    /// Fetch a file's bytes at a git ref, or `None` if it doesn't exist there
    async fn get_file_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<u8>>>;

    /// List every comment on a pull request's conversation
    async fn list_issue_comments(&self, repo: &Repository, number: u64)
        -> Result<Vec<IssueComment>>;

    /// Post a new comment
    async fn create_comment(&self, repo: &Repository, number: u64, body: &str)
        -> Result<IssueComment>;

    /// Replace the body of an existing comment
    async fn update_comment(&self, repo: &Repository, comment_id: u64, body: &str)
        -> Result<IssueComment>;

    /// Delete a comment
    async fn delete_comment(&self, repo: &Repository, comment_id: u64) -> Result<()>;

    /// The account this client comments as
    async fn bot_identity(&self) -> Result<BotIdentity>;
}
