//! GitHub webhook deliveries: headers, payloads and signatures

use crate::handler::PullRequestEvent;
use hmac::{Hmac, Mac};
use nugget_github::Repository;
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header naming the event type
pub const EVENT_HEADER: &str = "x-github-event";
/// Header carrying `sha256=<hex hmac of the body>`
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// Header with the unique delivery id
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Pull request actions that can change the lockfile diff
const HANDLED_ACTIONS: &[&str] = &["opened", "synchronize", "reopened"];

/// Check a delivery's `X-Hub-Signature-256` against the shared secret
///
/// The comparison is constant time. A missing or malformed header fails.
pub fn verify_signature(secret: &[u8], body: &[u8], header: Option<&str>) -> bool {
    let Some(signature) = header.and_then(|value| value.strip_prefix("sha256=")) else {
        return false;
    };
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// `pull_request` webhook payload, reduced to the fields the bot reads
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    /// `opened`, `synchronize`, `closed`, ...
    pub action: String,
    /// Pull request number
    pub number: u64,
    /// The pull request
    pub pull_request: PullRequestRefs,
    /// Repository the pull request belongs to
    pub repository: RepositoryPayload,
    /// Present when delivered to a GitHub App
    #[serde(default)]
    pub installation: Option<InstallationPayload>,
}

/// Base and head of a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRefs {
    /// Target branch
    pub base: GitRef,
    /// Source branch
    pub head: GitRef,
}

/// One side of a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA
    pub sha: String,
}

/// Repository in a webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    /// Repository name
    pub name: String,
    /// Owning account
    pub owner: OwnerPayload,
}

/// Repository owner in a webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    /// Account login
    pub login: String,
}

/// App installation in a webhook payload
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InstallationPayload {
    /// Installation id
    pub id: u64,
}

impl PullRequestPayload {
    /// Whether this action can change the lockfile diff
    pub fn is_handled(&self) -> bool {
        HANDLED_ACTIONS.contains(&self.action.as_str())
    }

    /// Installation the delivery was made for, if any
    pub fn installation_id(&self) -> Option<u64> {
        self.installation.map(|installation| installation.id)
    }

    /// The event the handler works on
    pub fn to_event(&self) -> PullRequestEvent {
        PullRequestEvent {
            repo: Repository::new(&self.repository.owner.login, &self.repository.name),
            number: self.number,
            base_ref: self.pull_request.base.ref_name.clone(),
            head_sha: self.pull_request.head.sha.clone(),
        }
    }
}
