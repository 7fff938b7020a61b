//! GitHub REST API implementation of [`PullRequestApi`]

use crate::api::PullRequestApi;
use crate::auth::AppCredentials;
use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::types::{
    AppInfo, BotIdentity, CommentBody, FileContent, InstallationToken, IssueComment,
    PullRequestFile, Repository, User,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Method;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

/// Public GitHub API
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub caps comment listings at 100 per page
const COMMENTS_PER_PAGE: u32 = 100;

/// Append path segments to an API base URL
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::other(format!("API URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GitHub client authenticated with a bearer token
///
/// The token is either a personal access token or an installation token
/// obtained through [`GitHubApp::installation_client`].
#[derive(Clone)]
pub struct GitHubClient {
    http: HttpClient,
    api_url: Url,
    token: String,
    identity: Arc<OnceCell<BotIdentity>>,
}

impl GitHubClient {
    /// Create a client for `api_url` (e.g. [`GITHUB_API_URL`])
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a valid URL.
    pub fn new(http: HttpClient, api_url: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            api_url: Url::parse(api_url)?,
            token: token.into(),
            identity: Arc::new(OnceCell::new()),
        })
    }

    /// Use a known identity instead of resolving it through `GET /user`
    pub fn with_identity(self, identity: BotIdentity) -> Self {
        Self {
            identity: Arc::new(OnceCell::new_with(Some(identity))),
            ..self
        }
    }

    fn repo_endpoint(&self, repo: &Repository, rest: &[&str]) -> Result<Url> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        segments.extend_from_slice(rest);
        endpoint(&self.api_url, &segments)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url.as_str())
            .field("identity", &self.identity.get())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl PullRequestApi for GitHubClient {
    async fn list_pull_request_files(
        &self,
        repo: &Repository,
        number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestFile>> {
        let number = number.to_string();
        let mut url = self.repo_endpoint(repo, &["pulls", number.as_str(), "files"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        self.http
            .send_json(self.http.request(Method::GET, url, &self.token))
            .await
    }

    async fn get_file_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<u8>>> {
        let mut segments = vec!["contents"];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        let mut url = self.repo_endpoint(repo, &segments)?;
        url.query_pairs_mut().append_pair("ref", git_ref);

        let content: FileContent = match self
            .http
            .send_json(self.http.request(Method::GET, url, &self.token))
            .await
        {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                debug!(%repo, path, git_ref, "file does not exist at ref");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if content.kind != "file" {
            return Err(Error::other(format!("{path} is a {}, not a file", content.kind)));
        }

        match (content.encoding.as_deref(), content.content.as_deref()) {
            (Some("base64"), Some(encoded)) if !encoded.is_empty() => {
                // The contents API wraps base64 at 60 columns
                let compact: String = encoded.split_whitespace().collect();
                Ok(Some(STANDARD.decode(compact)?))
            }
            _ => {
                // Files over 1 MB come without inline content
                let download_url = content
                    .download_url
                    .ok_or_else(|| Error::other(format!("no content or download URL for {path}")))?;
                debug!(%repo, path, "fetching file through download URL");
                let url = Url::parse(&download_url)?;
                let bytes = self
                    .http
                    .send_bytes(self.http.request(Method::GET, url, &self.token))
                    .await?;
                Ok(Some(bytes))
            }
        }
    }

    async fn list_issue_comments(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<IssueComment>> {
        let number = number.to_string();
        let base = self.repo_endpoint(repo, &["issues", number.as_str(), "comments"])?;
        let mut comments = Vec::new();

        for page in 1.. {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("per_page", &COMMENTS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let batch: Vec<IssueComment> = self
                .http
                .send_json(self.http.request(Method::GET, url, &self.token))
                .await?;
            let last_page = batch.len() < COMMENTS_PER_PAGE as usize;
            comments.extend(batch);
            if last_page {
                break;
            }
        }

        Ok(comments)
    }

    async fn create_comment(
        &self,
        repo: &Repository,
        number: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let number = number.to_string();
        let url = self.repo_endpoint(repo, &["issues", number.as_str(), "comments"])?;
        let request = self
            .http
            .request(Method::POST, url, &self.token)
            .json(&CommentBody { body });
        self.http.send_json(request).await
    }

    async fn update_comment(
        &self,
        repo: &Repository,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let id = comment_id.to_string();
        let url = self.repo_endpoint(repo, &["issues", "comments", id.as_str()])?;
        let request = self
            .http
            .request(Method::PATCH, url, &self.token)
            .json(&CommentBody { body });
        self.http.send_json(request).await
    }

    async fn delete_comment(&self, repo: &Repository, comment_id: u64) -> Result<()> {
        let id = comment_id.to_string();
        let url = self.repo_endpoint(repo, &["issues", "comments", id.as_str()])?;
        self.http
            .send(self.http.request(Method::DELETE, url, &self.token))
            .await?;
        Ok(())
    }

    async fn bot_identity(&self) -> Result<BotIdentity> {
        let identity = self
            .identity
            .get_or_try_init(|| async {
                let url = endpoint(&self.api_url, &["user"])?;
                let user: User = self
                    .http
                    .send_json(self.http.request(Method::GET, url, &self.token))
                    .await?;
                Ok::<_, Error>(BotIdentity::from(user))
            })
            .await?;
        Ok(identity.clone())
    }
}

/// A GitHub App, able to mint installation clients
#[derive(Debug, Clone)]
pub struct GitHubApp {
    http: HttpClient,
    api_url: Url,
    credentials: AppCredentials,
}

impl GitHubApp {
    /// Create an app client for `api_url`
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a valid URL.
    pub fn new(http: HttpClient, api_url: &str, credentials: AppCredentials) -> Result<Self> {
        Ok(Self {
            http,
            api_url: Url::parse(api_url)?,
            credentials,
        })
    }

    /// Fetch the app's own metadata
    pub async fn app_info(&self) -> Result<AppInfo> {
        let url = endpoint(&self.api_url, &["app"])?;
        let jwt = self.credentials.jwt()?;
        self.http
            .send_json(self.http.request(Method::GET, url, &jwt))
            .await
    }

    /// Exchange the app JWT for an installation access token
    pub async fn installation_token(&self, installation_id: u64) -> Result<InstallationToken> {
        let id = installation_id.to_string();
        let url = endpoint(&self.api_url, &["app", "installations", id.as_str(), "access_tokens"])?;
        let jwt = self.credentials.jwt()?;
        self.http
            .send_json(self.http.request(Method::POST, url, &jwt))
            .await
    }

    /// Create a client acting as the given installation
    pub async fn installation_client(
        &self,
        installation_id: u64,
        identity: BotIdentity,
    ) -> Result<GitHubClient> {
        let token = self.installation_token(installation_id).await?;
        debug!(installation_id, expires_at = %token.expires_at, "minted installation token");
        Ok(GitHubClient::new(self.http.clone(), self.api_url.as_str(), token.token)?
            .with_identity(identity))
    }
}
