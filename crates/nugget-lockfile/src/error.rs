//! Error types for nugget-lockfile

use thiserror::Error;

/// Result type alias using nugget-lockfile Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading lockfiles
#[derive(Debug, Error)]
pub enum Error {
    /// Lockfile bytes are not valid UTF-8
    #[error("Lockfile is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// Neither the Berry nor the classic grammar accepted the lockfile
    #[error("Unparseable lockfile (berry: {berry}; classic: {classic})")]
    UnparseableLockfile {
        /// Why the Berry (YAML) attempt failed
        berry: String,
        /// Why the classic (v1) attempt failed
        classic: String,
    },
}
