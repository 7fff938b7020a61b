//! Collapsible HTML tables for each section of the diff comment

use nugget_lockfile::{ModifiedPackage, NormalizedPackage};
use std::fmt::{self, Display, Formatter, Write};

/// Escape text for an HTML body or attribute
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `<code>` per version, optionally struck through
struct Versions<'a> {
    versions: &'a [String],
    struck: bool,
}

impl Display for Versions<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for version in self.versions {
            let version = escape_html(version);
            if self.struck {
                writeln!(f, "        <del><code>{version}</code></del>")?;
            } else {
                writeln!(f, "        <code>{version}</code>")?;
            }
        }
        Ok(())
    }
}

fn versions(versions: &[String]) -> Versions<'_> {
    Versions {
        versions,
        struck: false,
    }
}

/// Which side a [`PackageTable`] lists
#[derive(Debug, Clone, Copy)]
pub(crate) enum PackageSection {
    Added,
    Removed,
}

impl PackageSection {
    fn summary(self) -> &'static str {
        match self {
            Self::Added => ":heavy_plus_sign:",
            Self::Removed => ":wastebasket:",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Added => "Packages Added",
            Self::Removed => "Packages Removed",
        }
    }
}

/// Table of packages that appeared or disappeared entirely
pub(crate) struct PackageTable<'a> {
    pub section: PackageSection,
    pub packages: &'a [(String, NormalizedPackage)],
}

impl Display for PackageTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "<details>")?;
        writeln!(
            f,
            "  <summary>{} ({}) {}</summary>",
            self.section.summary(),
            self.packages.len(),
            self.section.title()
        )?;
        writeln!(f, "  <table>")?;
        write_header(f, &["Package", "Version(s)"])?;
        for (name, package) in self.packages {
            writeln!(f, "    <tr>")?;
            writeln!(f, "      <td>{}</td>", escape_html(name))?;
            writeln!(f, "      <td>")?;
            write!(f, "{}", versions(&package.versions))?;
            writeln!(f, "      </td>")?;
            writeln!(f, "    </tr>")?;
        }
        writeln!(f, "  </table>")?;
        writeln!(f, "</details>")
    }
}

/// Table of packages whose version set changed
///
/// Removed versions are struck through ahead of added ones; versions still
/// installed get their own column.
pub(crate) struct ModifiedTable<'a> {
    pub packages: &'a [ModifiedPackage],
}

impl Display for ModifiedTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "<details>")?;
        writeln!(
            f,
            "  <summary>:hammer_and_wrench: ({}) Packages Modified</summary>",
            self.packages.len()
        )?;
        writeln!(f, "  <p></p>")?;
        writeln!(f, "  <table>")?;
        write_header(f, &["Package", "Version(s)", "Existing Version(s)"])?;
        for package in self.packages {
            writeln!(f, "    <tr>")?;
            writeln!(f, "      <td>{}</td>", escape_html(&package.pkg_name))?;
            writeln!(f, "      <td>")?;
            write!(
                f,
                "{}",
                Versions {
                    versions: &package.removed_versions,
                    struck: true,
                }
            )?;
            write!(f, "{}", versions(&package.added_versions))?;
            writeln!(f, "      </td>")?;
            writeln!(f, "      <td>")?;
            write!(f, "{}", versions(&package.existing_versions))?;
            writeln!(f, "      </td>")?;
            writeln!(f, "    </tr>")?;
        }
        writeln!(f, "  </table>")?;
        writeln!(f, "</details>")
    }
}

fn write_header(f: &mut impl Write, columns: &[&str]) -> fmt::Result {
    writeln!(f, "    <tr>")?;
    for column in columns {
        writeln!(f, "      <th>{column}</th>")?;
    }
    writeln!(f, "    </tr>")
}
