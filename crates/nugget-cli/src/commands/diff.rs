use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use nugget_bot::render_diff_comment;
use nugget_lockfile::{diff_lockfiles, LockfileDiff};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Placeholder for "no base lockfile"
const NO_BASE: &str = "-";

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Base lockfile, or `-` when there is none
    base: PathBuf,

    /// Head lockfile
    head: PathBuf,

    /// Output format
    #[arg(short, long = "output", value_enum, default_value = "human")]
    format: OutputFormat,

    /// Output JSON format (alias for --output json)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored summary
    Human,
    /// Machine-readable diff
    Json,
    /// The pull request comment body
    Markdown,
}

pub fn handle_diff_command(args: DiffArgs) -> Result<()> {
    let base = if args.base == Path::new(NO_BASE) {
        None
    } else {
        Some(read(&args.base)?)
    };
    let head = read(&args.head)?;

    let diff = diff_lockfiles(base.as_deref(), &head).context("Failed to diff lockfiles")?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        args.format
    };

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Human => write_human(&mut stdout, &diff)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &diff)
                .context("Failed to serialize diff")?;
            writeln!(stdout)?;
        }
        OutputFormat::Markdown => write!(stdout, "{}", render_diff_comment(&diff))?,
    }
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_human(out: &mut impl Write, diff: &LockfileDiff) -> io::Result<()> {
    if diff.is_empty() {
        writeln!(out, "{}", "No package version changes".green())?;
        return Ok(());
    }

    if !diff.added.is_empty() {
        writeln!(out, "\n➕ Packages Added ({}):", diff.added.len())?;
        for (name, package) in &diff.added {
            writeln!(out, "  {} {}", name.green(), package.versions.join(", "))?;
        }
    }

    if !diff.modified.is_empty() {
        writeln!(out, "\n🛠  Packages Modified ({}):", diff.modified.len())?;
        for package in &diff.modified {
            let mut changes: Vec<String> = package
                .removed_versions
                .iter()
                .map(|v| format!("-{v}").red().to_string())
                .collect();
            changes.extend(
                package
                    .added_versions
                    .iter()
                    .map(|v| format!("+{v}").green().to_string()),
            );
            write!(out, "  {} {}", package.pkg_name.yellow(), changes.join(" "))?;
            if !package.existing_versions.is_empty() {
                write!(
                    out,
                    " {}",
                    format!("(existing: {})", package.existing_versions.join(", ")).dimmed()
                )?;
            }
            writeln!(out)?;
        }
    }

    if !diff.removed.is_empty() {
        writeln!(out, "\n🗑  Packages Removed ({}):", diff.removed.len())?;
        for (name, package) in &diff.removed {
            writeln!(out, "  {} {}", name.red(), package.versions.join(", "))?;
        }
    }

    Ok(())
}
