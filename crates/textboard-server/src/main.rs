//! textboard server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite post store, and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use textboard_server::ServerConfig;
use textboard_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "textboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  if server_cfg.boards.is_empty() {
    tracing::warn!("no boards configured; every board request will 404");
  }

  let store_cfg = server_cfg.store_config();
  let store_path = store_cfg.path.clone();
  let store = SqliteStore::open(store_cfg)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let app = textboard_api::api_router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!(
    boards = ?server_cfg.boards.iter().collect::<Vec<_>>(),
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
