//! Publishing to the single bot-authored comment of a pull request

use crate::error::Result;
use nugget_github::{IssueComment, PullRequestApi, Repository};
use tracing::{debug, info};

/// What [`CommentPublisher::publish`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    /// No bot comment existed, a new one was posted
    Created(u64),
    /// The existing bot comment was rewritten
    Updated(u64),
    /// The existing bot comment already had this body
    Unchanged(u64),
}

/// Keeps at most one bot-authored comment on a pull request
pub struct CommentPublisher<'a> {
    api: &'a dyn PullRequestApi,
    repo: &'a Repository,
    number: u64,
}

impl<'a> CommentPublisher<'a> {
    /// Publisher for pull request `number` in `repo`
    pub fn new(api: &'a dyn PullRequestApi, repo: &'a Repository, number: u64) -> Self {
        Self { api, repo, number }
    }

    /// The first comment on the pull request written by the bot's identity
    pub async fn find_existing(&self) -> Result<Option<IssueComment>> {
        let identity = self.api.bot_identity().await?;
        let comments = self.api.list_issue_comments(self.repo, self.number).await?;
        Ok(comments
            .into_iter()
            .find(|comment| identity.authored(comment)))
    }

    /// Update the bot comment in place, or create it if there is none
    pub async fn publish(&self, body: &str) -> Result<PublishAction> {
        match self.find_existing().await? {
            Some(existing) if existing.body.as_deref() == Some(body) => {
                debug!(repo = %self.repo, pr = self.number, comment = existing.id, "comment already current");
                Ok(PublishAction::Unchanged(existing.id))
            }
            Some(existing) => {
                let updated = self.api.update_comment(self.repo, existing.id, body).await?;
                info!(repo = %self.repo, pr = self.number, comment = updated.id, "updated comment");
                Ok(PublishAction::Updated(updated.id))
            }
            None => {
                let created = self.api.create_comment(self.repo, self.number, body).await?;
                info!(repo = %self.repo, pr = self.number, comment = created.id, "created comment");
                Ok(PublishAction::Created(created.id))
            }
        }
    }

    /// Delete the bot comment, returning whether one existed
    pub async fn remove(&self) -> Result<bool> {
        let Some(existing) = self.find_existing().await? else {
            return Ok(false);
        };
        self.api.delete_comment(self.repo, existing.id).await?;
        info!(repo = %self.repo, pr = self.number, comment = existing.id, "deleted comment");
        Ok(true)
    }
}
