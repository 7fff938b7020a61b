//! Finds the lockfile among a pull request's changed files
//!
//! GitHub lists at most 3000 files per pull request, so a scan that runs
//! out of pages without finding the lockfile cannot tell "unchanged" from
//! "changed but not listed". That case is reported as
//! [`LockfileStatus::TooManyFiles`].

use crate::error::Result;
use nugget_config::BotSettings;
use nugget_github::{PullRequestApi, PullRequestFile, Repository};
use tracing::debug;

/// Outcome of scanning a pull request for a lockfile change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockfileStatus {
    /// The lockfile is among the changed files
    Found(PullRequestFile),
    /// Every changed file was listed and none is the lockfile
    NotFound,
    /// The listing cap was reached before the file list was exhausted
    TooManyFiles,
}

/// Page through the files of pull request `number` looking for `settings.lockfile_path`
pub async fn locate_lockfile(
    api: &dyn PullRequestApi,
    repo: &Repository,
    number: u64,
    settings: &BotSettings,
) -> Result<LockfileStatus> {
    for page in 1..=settings.max_pages {
        let files = api
            .list_pull_request_files(repo, number, page, settings.files_per_page)
            .await?;

        if files.is_empty() {
            debug!(%repo, pr = number, page, "file listing exhausted");
            return Ok(LockfileStatus::NotFound);
        }

        if let Some(file) = files
            .into_iter()
            .find(|file| file.filename == settings.lockfile_path)
        {
            debug!(%repo, pr = number, page, status = %file.status, "lockfile changed");
            return Ok(LockfileStatus::Found(file));
        }
    }

    Ok(LockfileStatus::TooManyFiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn repo() -> Repository {
        Repository::new("octo", "app")
    }

    #[tokio::test]
    async fn test_finds_lockfile_on_later_page() {
        let mut names: Vec<String> = (0..120).map(|i| format!("src/file{i}.js")).collect();
        names.insert(75, "yarn.lock".to_string());
        let api = FakeApi::new().with_files(names);

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        match status {
            LockfileStatus::Found(file) => assert_eq!(file.filename, "yarn.lock"),
            other => panic!("expected Found, got {other:?}"),
        }
        assert_eq!(api.file_pages_requested(), 2);
    }

    #[tokio::test]
    async fn test_nested_lockfile_is_not_a_match() {
        let api = FakeApi::new().with_files(["packages/web/yarn.lock", "README.md"]);

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        assert_eq!(status, LockfileStatus::NotFound);
    }

    #[tokio::test]
    async fn test_configured_path() {
        let api = FakeApi::new().with_files(["frontend/yarn.lock"]);
        let settings = BotSettings {
            lockfile_path: "frontend/yarn.lock".to_string(),
            ..BotSettings::default()
        };

        let status = locate_lockfile(&api, &repo(), 1, &settings).await.unwrap();

        assert!(matches!(status, LockfileStatus::Found(_)));
    }

    #[tokio::test]
    async fn test_empty_pull_request() {
        let api = FakeApi::new();

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        assert_eq!(status, LockfileStatus::NotFound);
        assert_eq!(api.file_pages_requested(), 1);
    }

    #[tokio::test]
    async fn test_exactly_at_cap_is_not_found() {
        let names: Vec<String> = (0..3000).map(|i| format!("f{i}")).collect();
        let api = FakeApi::new().with_files(names);

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        // 60 full pages, all inspected: the cap is reached without proof of
        // exhaustion
        assert_eq!(status, LockfileStatus::TooManyFiles);
        assert_eq!(api.file_pages_requested(), 60);
    }

    #[tokio::test]
    async fn test_over_cap_is_too_many_files() {
        let mut names: Vec<String> = (0..3000).map(|i| format!("f{i}")).collect();
        names.push("yarn.lock".to_string());
        let api = FakeApi::new().with_files(names);

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        assert_eq!(status, LockfileStatus::TooManyFiles);
        assert_eq!(api.file_pages_requested(), 60);
    }

    #[tokio::test]
    async fn test_removed_lockfile_still_found() {
        let api = FakeApi::new().with_file(PullRequestFile {
            filename: "yarn.lock".to_string(),
            status: "removed".to_string(),
            sha: None,
            raw_url: None,
        });

        let status = locate_lockfile(&api, &repo(), 1, &BotSettings::default())
            .await
            .unwrap();

        match status {
            LockfileStatus::Found(file) => assert!(file.is_removed()),
            other => panic!("expected Found, got {other:?}"),
        }
    }
}
