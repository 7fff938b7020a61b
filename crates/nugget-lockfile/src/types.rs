//! Core types shared by the parser, normalizer and diff engine

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which on-disk grammar a lockfile was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockfileFormat {
    /// Yarn 2+ lockfile, a plain YAML document
    Berry,
    /// Yarn 1 lockfile, a custom indentation based format
    Classic,
}

impl LockfileFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LockfileFormat::Berry => "berry",
            LockfileFormat::Classic => "classic",
        }
    }
}

impl fmt::Display for LockfileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolved value of a single lockfile entry
///
/// Only `version` takes part in diffing; the remaining fields are kept
/// for callers that want to display them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    /// Resolved version
    pub version: String,
    /// `resolved` URL (classic) or `resolution` locator (Berry)
    pub resolution: Option<String>,
    /// Integrity hash (classic) or checksum (Berry)
    pub integrity: Option<String>,
    /// Declared dependencies as name → range
    pub dependencies: BTreeMap<String, String>,
}

impl ResolvedEntry {
    /// Create an entry that only carries a version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }
}

/// Raw parser output: package spec string → resolved entry
pub type LockfileEntries = BTreeMap<String, ResolvedEntry>;

/// All distinct versions of one package, ascending and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedPackage {
    /// Versions in ascending string order
    pub versions: Vec<String>,
}

impl NormalizedPackage {
    /// Build a package from arbitrary versions, sorting and de-duplicating them
    pub fn from_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut package = Self::default();
        for version in versions {
            package.insert(version.into());
        }
        package
    }

    /// Insert a version at its sorted position.
    ///
    /// Returns `false` if the version was already present.
    pub fn insert(&mut self, version: String) -> bool {
        match self.versions.binary_search(&version) {
            Ok(_) => false,
            Err(index) => {
                self.versions.insert(index, version);
                true
            }
        }
    }

    /// Whether `version` is one of this package's versions
    pub fn contains(&self, version: &str) -> bool {
        self.versions
            .binary_search_by(|probe| probe.as_str().cmp(version))
            .is_ok()
    }
}
