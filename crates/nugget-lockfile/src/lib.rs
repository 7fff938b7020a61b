//! # nugget-lockfile
//!
//! Parsing and diffing of `yarn.lock` files.
//!
//! This crate provides functionality to:
//! - Parse both yarn lockfile grammars (Berry YAML and the classic v1 format)
//! - Normalize parsed entries into a package name → sorted versions mapping
//! - Diff two normalized lockfiles into added, removed and modified packages
//!
//! Everything here is synchronous and free of I/O. Fetching lockfiles and
//! reporting the diff belong to `nugget-github` and `nugget-bot`.
//!
//! ## Example
//!
//! ```rust
//! use nugget_lockfile::diff_lockfiles;
//!
//! let base = b"lodash@^4.17.0:\n  version \"4.17.20\"\n";
//! let head = b"lodash@^4.17.0:\n  version \"4.17.21\"\n";
//!
//! let diff = diff_lockfiles(Some(base), head).unwrap();
//! assert_eq!(diff.modified[0].pkg_name, "lodash");
//! assert_eq!(diff.modified[0].added_versions, vec!["4.17.21"]);
//! ```

#![warn(missing_docs)]

pub mod diff;
pub mod error;
pub mod normalize;
pub mod package_spec;
pub mod parser;
pub mod types;

pub use diff::{diff, LockfileDiff, ModifiedPackage};
pub use error::{Error, Result};
pub use normalize::{normalize, NormalizedLockfile};
pub use package_spec::PackageSpec;
pub use parser::{parse_lockfile, ParseAttempt, ParsedLockfile};
pub use types::{LockfileEntries, LockfileFormat, NormalizedPackage, ResolvedEntry};

use tracing::debug;

/// Parse and normalize raw lockfile bytes.
///
/// # Errors
/// Returns [`Error::InvalidEncoding`] for non UTF-8 input and
/// [`Error::UnparseableLockfile`] when neither grammar accepts the text.
pub fn load_lockfile(raw: &[u8]) -> Result<NormalizedLockfile> {
    let text = std::str::from_utf8(raw)?;
    let parsed = parse_lockfile(text)?;
    debug!(
        format = %parsed.format,
        entries = parsed.entries.len(),
        "parsed lockfile"
    );
    Ok(normalize(&parsed.entries))
}

/// Diff a base and a head lockfile given as raw bytes.
///
/// A missing base (`None`) is treated as an empty lockfile, so every
/// package of the head lockfile is reported as added.
///
/// # Errors
/// Fails if either side cannot be decoded or parsed.
pub fn diff_lockfiles(base: Option<&[u8]>, new: &[u8]) -> Result<LockfileDiff> {
    let base = match base {
        Some(raw) => load_lockfile(raw)?,
        None => NormalizedLockfile::default(),
    };
    let new = load_lockfile(new)?;
    Ok(diff(&base, &new))
}
