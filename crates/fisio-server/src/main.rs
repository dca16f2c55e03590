//! fisio-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured clinical store, and serves the REST API over HTTP.
//!
//! Every setting can also come from the environment with a `FISIO_` prefix,
//! e.g. `FISIO_PORT=9000`. Without a config file the server runs on
//! 127.0.0.1:8080 against an in-memory store, which is enough for local
//! frontend development.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use fisio_api::api_router;
use fisio_core::memory::MemoryStore;
use fisio_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fisio clinical record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Top-level configuration deserialised from config.toml.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:  String,
  #[serde(default = "default_port")]
  port:  u16,
  #[serde(default)]
  store: StoreBackend,
}

/// Which [`fisio_core::store::ClinicalStore`] implementation to serve from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum StoreBackend {
  Sqlite { path: PathBuf },
  #[default]
  Memory,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FISIO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let router = match &server_cfg.store {
    StoreBackend::Sqlite { path } => {
      let store_path = expand_tilde(path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      tracing::info!("Serving from SQLite store at {store_path:?}");
      api_router(Arc::new(store))
    }
    StoreBackend::Memory => {
      tracing::warn!("Serving from an in-memory store; data will not persist");
      api_router(Arc::new(MemoryStore::new()))
    }
  };

  let app = router.layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
