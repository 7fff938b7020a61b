//! In-memory [`PullRequestApi`] for unit tests

use async_trait::async_trait;
use nugget_github::{
    BotIdentity, Error, IssueComment, PullRequestApi, PullRequestFile, Repository, Result, User,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const BOT_LOGIN: &str = "nugget[bot]";

#[derive(Default)]
struct State {
    files: Vec<PullRequestFile>,
    contents: HashMap<(String, String), Vec<u8>>,
    failing_contents: HashSet<(String, String)>,
    comments: Vec<IssueComment>,
    next_comment_id: u64,
    file_pages_requested: u32,
    calls: Vec<String>,
}

/// A single pull request held in memory
pub struct FakeApi {
    state: Mutex<State>,
    identity: BotIdentity,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_comment_id: 100,
                ..State::default()
            }),
            identity: BotIdentity::app("nugget"),
        }
    }

    pub fn with_files<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |api, name| {
            api.with_file(PullRequestFile {
                filename: name.into(),
                status: "modified".to_string(),
                sha: None,
                raw_url: None,
            })
        })
    }

    pub fn with_file(self, file: PullRequestFile) -> Self {
        self.state.lock().unwrap().files.push(file);
        self
    }

    pub fn with_content(self, path: &str, git_ref: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .contents
            .insert((path.to_string(), git_ref.to_string()), content.as_bytes().to_vec());
        self
    }

    /// Make fetching `path` at `git_ref` fail with a server error
    pub fn with_content_error(self, path: &str, git_ref: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_contents
            .insert((path.to_string(), git_ref.to_string()));
        self
    }

    pub fn with_comment(self, id: u64, login: &str, kind: &str, body: &str) -> Self {
        self.state.lock().unwrap().comments.push(IssueComment {
            id,
            body: Some(body.to_string()),
            user: Some(User {
                login: login.to_string(),
                kind: kind.to_string(),
            }),
            html_url: None,
            created_at: None,
            updated_at: None,
        });
        self
    }

    pub fn comments(&self) -> Vec<IssueComment> {
        self.state.lock().unwrap().comments.clone()
    }

    pub fn bot_comments(&self) -> Vec<IssueComment> {
        self.comments()
            .into_iter()
            .filter(|comment| self.identity.authored(comment))
            .collect()
    }

    pub fn file_pages_requested(&self) -> u32 {
        self.state.lock().unwrap().file_pages_requested
    }

    /// Mutating calls in order, e.g. `create`, `update 100`, `delete 7`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl PullRequestApi for FakeApi {
    async fn list_pull_request_files(
        &self,
        _repo: &Repository,
        _number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestFile>> {
        let mut state = self.state.lock().unwrap();
        state.file_pages_requested += 1;
        let start = ((page - 1) * per_page) as usize;
        let end = (start + per_page as usize).min(state.files.len());
        Ok(state.files.get(start..end).unwrap_or_default().to_vec())
    }

    async fn get_file_content(
        &self,
        _repo: &Repository,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<u8>>> {
        let state = self.state.lock().unwrap();
        let key = (path.to_string(), git_ref.to_string());
        if state.failing_contents.contains(&key) {
            return Err(Error::GitHubApi {
                status: 500,
                message: "server error".to_string(),
            });
        }
        Ok(state.contents.get(&key).cloned())
    }

    async fn list_issue_comments(
        &self,
        _repo: &Repository,
        _number: u64,
    ) -> Result<Vec<IssueComment>> {
        Ok(self.comments())
    }

    async fn create_comment(
        &self,
        _repo: &Repository,
        _number: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_comment_id;
        state.next_comment_id += 1;
        let comment = IssueComment {
            id,
            body: Some(body.to_string()),
            user: Some(User {
                login: self.identity.login.clone(),
                kind: self.identity.kind.clone(),
            }),
            html_url: None,
            created_at: None,
            updated_at: None,
        };
        state.comments.push(comment.clone());
        state.calls.push("create".to_string());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        _repo: &Repository,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {comment_id}"));
        let comment = state
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| Error::NotFound(format!("comment {comment_id}")))?;
        comment.body = Some(body.to_string());
        Ok(comment.clone())
    }

    async fn delete_comment(&self, _repo: &Repository, comment_id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {comment_id}"));
        let before = state.comments.len();
        state.comments.retain(|comment| comment.id != comment_id);
        if state.comments.len() == before {
            return Err(Error::NotFound(format!("comment {comment_id}")));
        }
        Ok(())
    }

    async fn bot_identity(&self) -> Result<BotIdentity> {
        Ok(self.identity.clone())
    }
}
