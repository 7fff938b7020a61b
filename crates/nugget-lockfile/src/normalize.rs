//! Collapse parsed lockfile entries into package name → versions

use crate::package_spec::package_name;
use crate::types::{LockfileEntries, NormalizedPackage};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Canonical lockfile form used for diffing
///
/// Backed by a `BTreeMap`, so iteration is always in ascending package
/// name order. The diff engine's merge walk depends on that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedLockfile {
    packages: BTreeMap<String, NormalizedPackage>,
}

impl NormalizedLockfile {
    /// Create an empty lockfile
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `version` for `name`, keeping versions sorted and unique
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.packages
            .entry(name.into())
            .or_default()
            .insert(version.into());
    }

    /// Look up a package by name
    pub fn get(&self, name: &str) -> Option<&NormalizedPackage> {
        self.packages.get(name)
    }

    /// Number of distinct packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether there are no packages at all
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate packages in ascending name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, NormalizedPackage> {
        self.packages.iter()
    }
}

impl<'a> IntoIterator for &'a NormalizedLockfile {
    type Item = (&'a String, &'a NormalizedPackage);
    type IntoIter = btree_map::Iter<'a, String, NormalizedPackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

impl<N, V> FromIterator<(N, V)> for NormalizedLockfile
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut lockfile = Self::new();
        for (name, version) in iter {
            lockfile.insert(name, version);
        }
        lockfile
    }
}

/// Normalize parser output.
///
/// Every spec key contributes its entry's version to the package named by
/// the key (the first alias, for comma-joined keys).
pub fn normalize(entries: &LockfileEntries) -> NormalizedLockfile {
    entries
        .iter()
        .map(|(spec, entry)| (package_name(spec), entry.version.as_str()))
        .collect()
}
