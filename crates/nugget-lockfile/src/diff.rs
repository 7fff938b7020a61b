//! Lockfile diff engine
//!
//! Both inputs iterate in ascending package name order, so the diff is a
//! single merge walk over the two sequences (O(n + m)). Output lists keep
//! that order, which keeps rendered comments reproducible.

use crate::normalize::NormalizedLockfile;
use crate::types::NormalizedPackage;
use serde::Serialize;
use std::cmp::Ordering;

/// A package present on both sides whose version set changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedPackage {
    /// Package name
    pub pkg_name: String,
    /// Versions only present in the new lockfile
    pub added_versions: Vec<String>,
    /// Versions present on both sides
    pub existing_versions: Vec<String>,
    /// Versions only present in the base lockfile
    pub removed_versions: Vec<String>,
}

/// Package-level changes between two lockfiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockfileDiff {
    /// Packages only present in the new lockfile
    pub added: Vec<(String, NormalizedPackage)>,
    /// Packages present on both sides with different versions
    pub modified: Vec<ModifiedPackage>,
    /// Packages only present in the base lockfile
    pub removed: Vec<(String, NormalizedPackage)>,
}

impl LockfileDiff {
    /// True when no package version changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Diff two normalized lockfiles
pub fn diff(base: &NormalizedLockfile, new: &NormalizedLockfile) -> LockfileDiff {
    let mut result = LockfileDiff::default();
    let mut base_iter = base.iter().peekable();
    let mut new_iter = new.iter().peekable();

    while let (Some(&(base_name, base_pkg)), Some(&(new_name, new_pkg))) =
        (base_iter.peek(), new_iter.peek())
    {
        match base_name.cmp(new_name) {
            Ordering::Equal => {
                if let Some(modified) = compare_versions(base_name, base_pkg, new_pkg) {
                    result.modified.push(modified);
                }
                base_iter.next();
                new_iter.next();
            }
            Ordering::Less => {
                result.removed.push((base_name.clone(), base_pkg.clone()));
                base_iter.next();
            }
            Ordering::Greater => {
                result.added.push((new_name.clone(), new_pkg.clone()));
                new_iter.next();
            }
        }
    }

    result
        .removed
        .extend(base_iter.map(|(name, pkg)| (name.clone(), pkg.clone())));
    result
        .added
        .extend(new_iter.map(|(name, pkg)| (name.clone(), pkg.clone())));

    result
}

fn compare_versions(
    name: &str,
    base: &NormalizedPackage,
    new: &NormalizedPackage,
) -> Option<ModifiedPackage> {
    let removed_versions = difference(base, new);
    let added_versions = difference(new, base);

    if removed_versions.is_empty() && added_versions.is_empty() {
        return None;
    }

    let existing_versions = new
        .versions
        .iter()
        .filter(|version| base.contains(version))
        .cloned()
        .collect();

    Some(ModifiedPackage {
        pkg_name: name.to_string(),
        added_versions,
        existing_versions,
        removed_versions,
    })
}

/// Versions of `left` missing from `right`, in `left`'s order
fn difference(left: &NormalizedPackage, right: &NormalizedPackage) -> Vec<String> {
    left.versions
        .iter()
        .filter(|version| !right.contains(version))
        .cloned()
        .collect()
}
