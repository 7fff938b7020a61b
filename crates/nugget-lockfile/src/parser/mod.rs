//! yarn.lock parsers
//!
//! Two grammars are supported and tried in order:
//! - [`berry`]: Yarn 2+ lockfiles, which are plain YAML
//! - [`classic`]: Yarn 1 lockfiles, a custom indentation based format
//!
//! Each grammar reports a [`ParseAttempt`] instead of an error so the
//! fallback chain stays explicit. Only when every attempt fails does
//! [`parse_lockfile`] surface [`Error::UnparseableLockfile`].

pub mod berry;
pub mod classic;

use crate::types::{LockfileEntries, LockfileFormat};
use crate::{Error, Result};
use tracing::debug;

/// A lockfile that one of the grammars accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLockfile {
    /// Grammar that produced `entries`
    pub format: LockfileFormat,
    /// Package spec → resolved entry
    pub entries: LockfileEntries,
}

/// Outcome of trying a single grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAttempt {
    /// The grammar accepted the text
    Success(ParsedLockfile),
    /// The grammar rejected the text, with a reason
    Failure(String),
}

impl ParseAttempt {
    /// Convert into a `Result`, keeping the failure reason as the error
    pub fn into_result(self) -> std::result::Result<ParsedLockfile, String> {
        match self {
            ParseAttempt::Success(parsed) => Ok(parsed),
            ParseAttempt::Failure(reason) => Err(reason),
        }
    }
}

/// Parse lockfile text with the Berry grammar, falling back to the classic one
///
/// # Errors
/// Returns [`Error::UnparseableLockfile`] carrying both failure reasons when
/// neither grammar accepts the text.
pub fn parse_lockfile(content: &str) -> Result<ParsedLockfile> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let berry = match berry::parse(content) {
        ParseAttempt::Success(parsed) => return Ok(parsed),
        ParseAttempt::Failure(reason) => reason,
    };
    debug!(reason = %berry, "not a berry lockfile, trying classic grammar");

    match classic::parse(content) {
        ParseAttempt::Success(parsed) => Ok(parsed),
        ParseAttempt::Failure(classic) => Err(Error::UnparseableLockfile { berry, classic }),
    }
}
