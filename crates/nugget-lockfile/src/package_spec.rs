//! Package spec keys such as `lodash@^4.17.0` or `@scope/pkg@npm:^1.2.0`

use regex::Regex;
use std::sync::LazyLock;

/// Name part of a spec: an optional leading scope `@`, then everything up to
/// the next `@`.
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@?[^@]+").expect("package name pattern is valid")
});

/// A raw lockfile key split into package name and range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec<'a> {
    /// The key exactly as it appeared in the lockfile
    pub raw: &'a str,
    /// Package name, including its scope for scoped packages
    pub name: &'a str,
    /// Everything after the name separator, empty when there is none
    pub range: &'a str,
}

impl<'a> PackageSpec<'a> {
    /// Split a lockfile key.
    ///
    /// Comma-joined keys (`foo@^1.0.0, foo@^1.1.0`) are taken by their first
    /// alias. A key without a usable separator is its own name.
    pub fn parse(raw: &'a str) -> Self {
        match PACKAGE_NAME.find(raw) {
            Some(m) => {
                let rest = &raw[m.end()..];
                Self {
                    raw,
                    name: m.as_str(),
                    range: rest.strip_prefix('@').unwrap_or(rest),
                }
            }
            None => Self {
                raw,
                name: raw,
                range: "",
            },
        }
    }

    /// Individual aliases of a comma-joined key
    pub fn aliases(&self) -> impl Iterator<Item = &'a str> {
        self.raw
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

/// Package name of a lockfile key
pub fn package_name(raw: &str) -> &str {
    PackageSpec::parse(raw).name
}
