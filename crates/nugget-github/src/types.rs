//! GitHub REST payloads used by the bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository, addressed by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    /// Repository owner/organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl Repository {
    /// Create a new Repository
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A file touched by a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// Path of the file relative to the repository root
    pub filename: String,
    /// `added`, `removed`, `modified`, `renamed`, ...
    pub status: String,
    /// Blob SHA of the file at the head revision
    #[serde(default)]
    pub sha: Option<String>,
    /// Raw download URL at the head revision
    #[serde(default)]
    pub raw_url: Option<String>,
}

impl PullRequestFile {
    /// Whether the pull request deletes this file
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

/// A GitHub account (user or bot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name, `<slug>[bot]` for GitHub Apps
    pub login: String,
    /// Account type: `User`, `Bot` or `Organization`
    #[serde(rename = "type")]
    pub kind: String,
}

/// A comment on an issue or pull request conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    /// Comment ID
    pub id: u64,
    /// Markdown body
    #[serde(default)]
    pub body: Option<String>,
    /// Author; absent for deleted accounts
    #[serde(default)]
    pub user: Option<User>,
    /// Browser URL of the comment
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last edit time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The account the bot acts as; used to recognise its own comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Login name the bot comments under
    pub login: String,
    /// Account type the bot comments under
    pub kind: String,
}

impl BotIdentity {
    /// Identity of a GitHub App installation: `<slug>[bot]`
    pub fn app(slug: &str) -> Self {
        Self {
            login: format!("{slug}[bot]"),
            kind: "Bot".to_string(),
        }
    }

    /// Whether `comment` was written by this identity
    pub fn authored(&self, comment: &IssueComment) -> bool {
        comment
            .user
            .as_ref()
            .is_some_and(|user| user.login == self.login && user.kind == self.kind)
    }
}

impl From<User> for BotIdentity {
    fn from(user: User) -> Self {
        Self {
            login: user.login,
            kind: user.kind,
        }
    }
}

/// GitHub App metadata from `GET /app`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// App ID
    pub id: u64,
    /// URL-friendly app name, the basis of the bot login
    pub slug: String,
    /// Display name
    pub name: String,
}

/// Installation access token from `POST /app/installations/{id}/access_tokens`
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationToken {
    /// Bearer token
    pub token: String,
    /// Expiry time (one hour after creation)
    pub expires_at: DateTime<Utc>,
}

/// Repository contents API response for a single file
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentBody<'a> {
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(login: &str, kind: &str) -> IssueComment {
        IssueComment {
            id: 1,
            body: None,
            user: Some(User {
                login: login.to_string(),
                kind: kind.to_string(),
            }),
            html_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_app_identity_matches_bot_comments_only() {
        let identity = BotIdentity::app("nugget");

        assert!(identity.authored(&comment("nugget[bot]", "Bot")));
        assert!(!identity.authored(&comment("nugget[bot]", "User")));
        assert!(!identity.authored(&comment("octocat", "User")));
    }

    #[test]
    fn test_comment_without_author_is_not_ours() {
        let identity = BotIdentity::app("nugget");
        let mut orphan = comment("nugget[bot]", "Bot");
        orphan.user = None;
        assert!(!identity.authored(&orphan));
    }

    #[test]
    fn test_deserialize_comment() {
        let comment: IssueComment = serde_json::from_str(
            r#"{
                "id": 42,
                "body": "hello",
                "user": {"login": "nugget[bot]", "type": "Bot", "id": 7},
                "html_url": "https://github.com/o/r/pull/1#issuecomment-42",
                "created_at": "2024-01-15T10:00:00Z",
                "updated_at": "2024-01-15T10:05:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(comment.id, 42);
        assert_eq!(comment.user.unwrap().kind, "Bot");
        assert!(comment.updated_at > comment.created_at);
    }

    #[test]
    fn test_repository_display() {
        assert_eq!(Repository::new("octo", "app").to_string(), "octo/app");
    }
}
