//! Application configuration.
//!
//! Values come from `config.toml` first, then environment variables (a `.env`
//! file is loaded if present), then the defaults below.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Largest request body accepted (PDF uploads)
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ==================== Session Configuration ====================

/// Idle minutes before a play session is discarded
pub const DEFAULT_SESSION_EXPIRY_MINUTES: i64 = 60;

/// Longest accepted idle period (30 days)
pub const MAX_SESSION_EXPIRY_MINUTES: i64 = 30 * 24 * 60;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Display Configuration ====================

/// Filename column width in the PDF list
pub const PDF_TITLE_WIDTH: usize = 50;

/// Index column width in the PDF list
pub const PDF_INDEX_WIDTH: usize = 10;

// ==================== File Structure ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
  database: Option<DatabaseSection>,
  server: Option<ServerSection>,
  storage: Option<StorageSection>,
  session: Option<SessionSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
  port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
  uploads_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
  expiry_minutes: Option<i64>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub database_path: PathBuf,
  pub port: u16,
  pub uploads_dir: PathBuf,
  pub session_expiry_minutes: i64,
}

impl Config {
  /// Load with priority: config.toml > environment > default
  pub fn load() -> Self {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let file = match std::fs::read_to_string("config.toml") {
      Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
        Ok(parsed) => parsed,
        Err(e) => {
          tracing::warn!("Ignoring malformed config.toml: {}", e);
          FileConfig::default()
        }
      },
      Err(_) => FileConfig::default(),
    };

    Self::resolve(file, |key| std::env::var(key).ok())
  }

  /// Parse a config.toml body, consulting `env` for missing keys
  pub fn from_toml_str(
    contents: &str,
    env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, toml::de::Error> {
    let file = toml::from_str::<FileConfig>(contents)?;
    Ok(Self::resolve(file, env))
  }

  fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
    let database_path = file
      .database
      .and_then(|d| d.path)
      .or_else(|| env("DATABASE_PATH"))
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(paths::db_path()));

    let port = file
      .server
      .and_then(|s| s.port)
      .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
      .unwrap_or(DEFAULT_SERVER_PORT);

    let uploads_dir = file
      .storage
      .and_then(|s| s.uploads_dir)
      .or_else(|| env("UPLOADS_DIR"))
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(paths::uploads_dir()));

    let session_expiry_minutes = file
      .session
      .and_then(|s| s.expiry_minutes)
      .or_else(|| env("SESSION_EXPIRY_MINUTES").and_then(|m| m.parse().ok()))
      .filter(|m| (1..=MAX_SESSION_EXPIRY_MINUTES).contains(m))
      .unwrap_or(DEFAULT_SESSION_EXPIRY_MINUTES);

    Self {
      database_path,
      port,
      uploads_dir,
      session_expiry_minutes,
    }
  }

  /// Get the full server bind address
  pub fn bind_addr(&self) -> String {
    format!("{}:{}", SERVER_ADDR, self.port)
  }

  pub fn database_path(&self) -> &Path {
    &self.database_path
  }
}
