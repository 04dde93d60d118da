//! Process configuration for the textboard server.
//!
//! Configuration is loaded once by the binary and handed to
//! [`SqliteStore::open`](textboard_store_sqlite::SqliteStore::open) as a
//! [`StoreConfig`]; nothing reads it globally.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use textboard_core::board::BoardSet;
use textboard_store_sqlite::StoreConfig;

/// Prefix for environment overrides, e.g. `TEXTBOARD_PORT=9000`.
pub const ENV_PREFIX: &str = "TEXTBOARD";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Boards accepting posts. Requests for any other board get a 404.
  #[serde(default)]
  pub boards:     BoardSet,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("textboard.db") }

impl ServerConfig {
  /// Layer the file at `path` (optional) under `TEXTBOARD_*` variables.
  ///
  /// `TEXTBOARD_BOARDS` takes a comma-separated list.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("boards"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The storage settings, with a leading `~` in `store_path` expanded.
  pub fn store_config(&self) -> StoreConfig {
    StoreConfig {
      path:   expand_tilde(&self.store_path),
      boards: self.boards.clone(),
    }
  }
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
