//! Pull request event flow: locate, fetch, diff, publish

use crate::composer::{
    render_diff_comment, render_too_many_files_comment, CommentPublisher, PublishAction,
};
use crate::error::Result;
use crate::locator::{locate_lockfile, LockfileStatus};
use nugget_config::BotSettings;
use nugget_github::{PullRequestApi, Repository};
use nugget_lockfile::{diff_lockfiles, LockfileDiff};
use tracing::{info, info_span, warn, Instrument};

/// The parts of a pull request event the bot acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Repository the pull request belongs to
    pub repo: Repository,
    /// Pull request number
    pub number: u64,
    /// Branch the pull request merges into
    pub base_ref: String,
    /// Commit at the tip of the pull request
    pub head_sha: String,
}

/// What handling an event did to the pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The lockfile is untouched; a stale bot comment was deleted if present
    NoLockfileChange {
        /// Whether a bot comment was deleted
        removed_comment: bool,
    },
    /// Too many files to tell; the bot comment now says so
    TooManyFiles,
    /// The diff was published
    Reported {
        /// How the comment was written
        action: PublishAction,
        /// The published diff
        diff: LockfileDiff,
    },
}

/// Handle one `opened`/`synchronize` event for a pull request
///
/// # Errors
///
/// GitHub failures and unparseable lockfiles abort the event; nothing is
/// published in that case. A base lockfile that cannot be fetched is the
/// exception and diffs as an empty lockfile.
pub async fn handle_pull_request(
    api: &dyn PullRequestApi,
    settings: &BotSettings,
    event: &PullRequestEvent,
) -> Result<Outcome> {
    let span = info_span!("pull_request", repo = %event.repo, pr = event.number);
    process(api, settings, event).instrument(span).await
}

async fn process(
    api: &dyn PullRequestApi,
    settings: &BotSettings,
    event: &PullRequestEvent,
) -> Result<Outcome> {
    let repo = &event.repo;
    let publisher = CommentPublisher::new(api, repo, event.number);

    let file = match locate_lockfile(api, repo, event.number, settings).await? {
        LockfileStatus::Found(file) => file,
        LockfileStatus::NotFound => {
            info!(lockfile = %settings.lockfile_path, "no lockfile change found");
            let removed_comment = publisher.remove().await?;
            return Ok(Outcome::NoLockfileChange { removed_comment });
        }
        LockfileStatus::TooManyFiles => {
            warn!(limit = settings.file_limit(), "too many files in pull request");
            publisher.remove().await?;
            publisher
                .publish(&render_too_many_files_comment(settings.file_limit()))
                .await?;
            return Ok(Outcome::TooManyFiles);
        }
    };

    info!(lockfile = %file.filename, status = %file.status, "detected lockfile change");

    let head = if file.is_removed() {
        None
    } else {
        api.get_file_content(repo, &settings.lockfile_path, &event.head_sha)
            .await?
    };
    if head.is_none() {
        warn!(git_ref = %event.head_sha, "no lockfile at head, treating as empty");
    }

    // An unreadable base lockfile diffs as empty so the head is still reported.
    let base = match api
        .get_file_content(repo, &settings.lockfile_path, &event.base_ref)
        .await
    {
        Ok(Some(content)) => Some(content),
        Ok(None) => {
            info!(git_ref = %event.base_ref, "no lockfile in base ref");
            None
        }
        Err(err) => {
            warn!(
                git_ref = %event.base_ref,
                error = %err,
                "failed to fetch base lockfile, treating as empty"
            );
            None
        }
    };

    let diff = diff_lockfiles(base.as_deref(), head.as_deref().unwrap_or_default())?;
    info!(
        added = diff.added.len(),
        modified = diff.modified.len(),
        removed = diff.removed.len(),
        "computed lockfile diff"
    );

    let action = publisher.publish(&render_diff_comment(&diff)).await?;
    Ok(Outcome::Reported { action, diff })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::testing::{FakeApi, BOT_LOGIN};
    use nugget_github::PullRequestFile;

    const BASE: &str = r#"# yarn lockfile v1


react@^16.0.0:
  version "16.0.0"

react@^16.1.0:
  version "16.1.0"

lodash@^4.17.0:
  version "4.17.0"
"#;

    const HEAD: &str = r#"__metadata:
  version: 6

"react@npm:^16.1.0":
  version: 16.1.0

"react@npm:^17.0.0":
  version: 17.0.0

"@scope/pkg@npm:^1.2.0":
  version: 1.2.0
"#;

    fn event() -> PullRequestEvent {
        PullRequestEvent {
            repo: Repository::new("octo", "app"),
            number: 9,
            base_ref: "main".to_string(),
            head_sha: "abc123".to_string(),
        }
    }

    async fn run(api: &FakeApi) -> Outcome {
        handle_pull_request(api, &BotSettings::default(), &event())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reports_diff() {
        let api = FakeApi::new()
            .with_files(["src/index.js", "yarn.lock"])
            .with_content("yarn.lock", "main", BASE)
            .with_content("yarn.lock", "abc123", HEAD);

        let Outcome::Reported { action, diff } = run(&api).await else {
            panic!("expected a report");
        };
        assert_eq!(action, PublishAction::Created(100));
        assert_eq!(diff.added[0].0, "@scope/pkg");
        assert_eq!(diff.removed[0].0, "lodash");
        assert_eq!(diff.modified[0].pkg_name, "react");
        assert_eq!(diff.modified[0].removed_versions, vec!["16.0.0"]);
        assert_eq!(diff.modified[0].added_versions, vec!["17.0.0"]);
        assert_eq!(diff.modified[0].existing_versions, vec!["16.1.0"]);

        let comment = &api.bot_comments()[0];
        assert!(comment.body.as_deref().unwrap().contains("(1) Packages Modified"));
    }

    #[tokio::test]
    async fn test_missing_base_reports_all_added() {
        let api = FakeApi::new()
            .with_files(["yarn.lock"])
            .with_content("yarn.lock", "abc123", HEAD);

        let Outcome::Reported { diff, .. } = run(&api).await else {
            panic!("expected a report");
        };
        let added: Vec<&str> = diff.added.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(added, vec!["@scope/pkg", "react"]);
        assert!(diff.removed.is_empty());
    }

    #[tokio::test]
    async fn test_base_fetch_failure_treated_as_empty() {
        let api = FakeApi::new()
            .with_files(["yarn.lock"])
            .with_content_error("yarn.lock", "main")
            .with_content("yarn.lock", "abc123", HEAD);

        let Outcome::Reported { action, diff } = run(&api).await else {
            panic!("expected a report");
        };
        let added: Vec<&str> = diff.added.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(added, vec!["@scope/pkg", "react"]);
        assert!(diff.modified.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(action, PublishAction::Created(100));
        assert_eq!(api.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_removed_lockfile_reports_all_removed() {
        let api = FakeApi::new()
            .with_file(PullRequestFile {
                filename: "yarn.lock".to_string(),
                status: "removed".to_string(),
                sha: None,
                raw_url: None,
            })
            .with_content("yarn.lock", "main", BASE);

        let Outcome::Reported { diff, .. } = run(&api).await else {
            panic!("expected a report");
        };
        assert!(diff.added.is_empty());
        let removed: Vec<&str> = diff.removed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(removed, vec!["lodash", "react"]);
    }

    #[tokio::test]
    async fn test_range_only_change_posts_explanation() {
        let api = FakeApi::new()
            .with_files(["yarn.lock"])
            .with_content("yarn.lock", "main", "left-pad@^1.0.0:\n  version \"1.3.0\"\n")
            .with_content(
                "yarn.lock",
                "abc123",
                "left-pad@^1.0.0, left-pad@^1.1.0:\n  version \"1.3.0\"\n",
            );

        let Outcome::Reported { diff, .. } = run(&api).await else {
            panic!("expected a report");
        };
        assert!(diff.is_empty());
        let body = api.bot_comments()[0].body.clone().unwrap();
        assert!(body.contains("no actual package version changes"));
    }

    #[tokio::test]
    async fn test_updates_existing_comment_on_synchronize() {
        let api = FakeApi::new()
            .with_comment(42, BOT_LOGIN, "Bot", "stale diff")
            .with_files(["yarn.lock"])
            .with_content("yarn.lock", "main", BASE)
            .with_content("yarn.lock", "abc123", HEAD);

        let Outcome::Reported { action, .. } = run(&api).await else {
            panic!("expected a report");
        };
        assert_eq!(action, PublishAction::Updated(42));
        assert_eq!(api.bot_comments().len(), 1);
    }

    #[tokio::test]
    async fn test_no_lockfile_change_deletes_stale_comment() {
        let api = FakeApi::new()
            .with_comment(42, BOT_LOGIN, "Bot", "stale diff")
            .with_files(["README.md"]);

        let outcome = run(&api).await;

        assert_eq!(
            outcome,
            Outcome::NoLockfileChange {
                removed_comment: true
            }
        );
        assert!(api.bot_comments().is_empty());
    }

    #[tokio::test]
    async fn test_no_lockfile_change_without_comment() {
        let api = FakeApi::new().with_files(["README.md"]);

        let outcome = run(&api).await;

        assert_eq!(
            outcome,
            Outcome::NoLockfileChange {
                removed_comment: false
            }
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_too_many_files_replaces_comment() {
        let names: Vec<String> = (0..3001).map(|i| format!("src/f{i}.js")).collect();
        let api = FakeApi::new()
            .with_comment(42, BOT_LOGIN, "Bot", "stale diff")
            .with_files(names);

        let outcome = run(&api).await;

        assert_eq!(outcome, Outcome::TooManyFiles);
        assert_eq!(api.calls(), vec!["delete 42", "create"]);
        let body = api.bot_comments()[0].body.clone().unwrap();
        assert!(body.contains("more than 3000 file changes"));
    }

    #[tokio::test]
    async fn test_unparseable_head_publishes_nothing() {
        let api = FakeApi::new()
            .with_files(["yarn.lock"])
            .with_content("yarn.lock", "main", BASE)
            .with_content("yarn.lock", "abc123", "foo@^1.0.0:\n   version \"1.0.0\"\n");

        let result = handle_pull_request(&api, &BotSettings::default(), &event()).await;

        assert!(matches!(result, Err(BotError::Lockfile(_))));
        assert!(api.calls().is_empty());
    }
}
