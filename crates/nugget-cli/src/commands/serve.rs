use anyhow::{Context, Result};
use clap::Args;
use nugget_bot::{clients, serve, AppState};
use nugget_config::ConfigManager;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "nugget.toml";

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file path (defaults to ./nugget.toml if present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding config and PORT
    #[arg(long)]
    port: Option<u16>,
}

pub fn handle_serve_command(args: ServeArgs) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: ServeArgs) -> Result<()> {
    let config_path = args.config.or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    });

    let manager = ConfigManager::load(config_path.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(path) = manager.config_path() {
        info!(path = %path.display(), "loaded configuration");
    }

    let mut config = manager.into_config();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let clients = clients::from_config(&config)
        .await
        .context("Failed to set up GitHub authentication")?;

    let addr = (config.server.host.as_str(), config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}:{}", addr.0, addr.1))?;

    let state = AppState {
        clients,
        settings: config.bot,
        webhook_secret: config.server.webhook_secret,
    };
    if state.webhook_secret.is_none() {
        warn!("no webhook secret configured, deliveries are not authenticated");
    }

    serve(listener, state).await.context("Server error")
}
