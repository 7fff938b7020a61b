//! Comment bodies and the single bot comment they are published to

mod publisher;
mod templates;

pub use publisher::{CommentPublisher, PublishAction};

use nugget_lockfile::LockfileDiff;
use std::fmt::{self, Display, Formatter};
use templates::{ModifiedTable, PackageSection, PackageTable};

const HEADER: &str = ":cat2: Nugget noticed a `yarn.lock` file change ";

const NO_VERSION_CHANGES: &str = "but reports that there are no actual package version changes.\n\n\
This *usually* means a new version range was added/removed to your `yarn.lock` \
that got resolved to an existing version using \
[semantic versioning (semver)](https://semver.org/).\n\n";

const VERSION_CHANGES: &str = "and reports the following package version changes:\n\n";

const LEGEND_HEADER: &str = "\n---\n\n### What is :cat2: Nugget telling you?\n";

const LEGEND_ADDED: &str =
    ":heavy_plus_sign: **Packages Added**: What new *package* has been added?\n\n";

const LEGEND_MODIFIED: &str = ":hammer_and_wrench: **Packages Modified**: \
What *version* has been added/removed to an existing *package*?\n\
`x.y.z` = version added || ~`x.y.z`~ = version removed\n\
*Existing versions* is a helpful indication of what other versions are still installed.\n\n";

const LEGEND_REMOVED: &str =
    ":wastebasket: **Packages Removed**: What *package* has been entirely removed from your project?\n";

const FILE_LISTING_DOCS: &str =
    "https://docs.github.com/en/rest/pulls/pulls#list-pull-requests-files";

/// Render the comment reporting a lockfile diff
///
/// An empty diff still produces a comment: the lockfile changed, but only
/// in ways that resolved to versions already installed.
pub fn render_diff_comment(diff: &LockfileDiff) -> String {
    DiffComment(diff).to_string()
}

/// Render the notice posted when the pull request has more files than can be listed
pub fn render_too_many_files_comment(limit: u64) -> String {
    format!(
        ":cat2: Nugget noticed that there are more than {limit} file changes. \
The [github api]({FILE_LISTING_DOCS}) only supports listing a maximum of {limit} files. \
Thus there may have been a `yarn.lock` file change that Nugget couldn't detect."
    )
}

struct DiffComment<'a>(&'a LockfileDiff);

impl Display for DiffComment<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let diff = self.0;
        f.write_str(HEADER)?;

        if diff.is_empty() {
            return f.write_str(NO_VERSION_CHANGES);
        }

        f.write_str(VERSION_CHANGES)?;
        if !diff.added.is_empty() {
            write!(
                f,
                "{}",
                PackageTable {
                    section: PackageSection::Added,
                    packages: &diff.added,
                }
            )?;
        }
        if !diff.modified.is_empty() {
            write!(
                f,
                "{}",
                ModifiedTable {
                    packages: &diff.modified,
                }
            )?;
        }
        if !diff.removed.is_empty() {
            write!(
                f,
                "{}",
                PackageTable {
                    section: PackageSection::Removed,
                    packages: &diff.removed,
                }
            )?;
        }

        f.write_str(LEGEND_HEADER)?;
        if !diff.added.is_empty() {
            f.write_str(LEGEND_ADDED)?;
        }
        if !diff.modified.is_empty() {
            f.write_str(LEGEND_MODIFIED)?;
        }
        if !diff.removed.is_empty() {
            f.write_str(LEGEND_REMOVED)?;
        }
        Ok(())
    }
}
