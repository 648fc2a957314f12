//! Application state shared by all handlers.

use chrono::Duration;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, DEFAULT_SESSION_EXPIRY_MINUTES};
use crate::db::DbPool;
use crate::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
  pub db: DbPool,

  /// Active play sessions, one per (guild, user)
  pub sessions: Arc<SessionRegistry>,

  /// Base directory for uploaded PDFs (one subdirectory per guild)
  pub uploads_dir: PathBuf,
}

impl AppState {
  pub fn new(db: DbPool, sessions: SessionRegistry, uploads_dir: PathBuf) -> Self {
    Self {
      db,
      sessions: Arc::new(sessions),
      uploads_dir,
    }
  }

  pub fn from_config(db: DbPool, config: &Config) -> Self {
    Self::new(
      db,
      SessionRegistry::new(
        Duration::try_minutes(config.session_expiry_minutes)
          .unwrap_or_else(|| Duration::minutes(DEFAULT_SESSION_EXPIRY_MINUTES)),
      ),
      config.uploads_dir.clone(),
    )
  }
}
