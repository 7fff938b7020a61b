//! Nugget CLI - yarn.lock change reporter for GitHub pull requests.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nugget")]
#[command(version, about = "Reports yarn.lock package version changes on GitHub pull requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the webhook server
    Serve(commands::ServeArgs),

    /// Diff two lockfiles locally
    ///
    /// Examples:
    ///   nugget diff old/yarn.lock yarn.lock
    ///   nugget diff - yarn.lock --json     # no base: everything is added
    Diff(commands::DiffArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Serve(args) => commands::handle_serve_command(args),
        Command::Diff(args) => commands::handle_diff_command(args),
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    let default_directives = match verbose {
        0 => "nugget=info,tower_http=info",
        1 => "nugget=debug,tower_http=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
