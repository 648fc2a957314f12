//! Project path functions - single source of truth for default file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! `config.toml`, `DATABASE_PATH` and `UPLOADS_DIR` take precedence over the
//! defaults built here (see config.rs).

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Default SQLite database path
pub fn db_path() -> String {
    format!("{}/flashdeck.db", data_dir())
}

/// Default directory for uploaded PDFs
pub fn uploads_dir() -> String {
    format!("{}/uploads", data_dir())
}

/// Where an uploaded file for a guild is stored
pub fn guild_upload_path(uploads_dir: &Path, guild_id: i64, file_name: &str) -> PathBuf {
    uploads_dir.join(guild_id.to_string()).join(file_name)
}

/// Strip any directory components a client put in an upload's file name
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_default() {
        // Can't test env override due to OnceLock, but verify it returns a value
        let dir = data_dir();
        assert!(!dir.is_empty());
    }

    #[test]
    fn test_db_path_format() {
        assert!(db_path().ends_with("/flashdeck.db"));
    }

    #[test]
    fn test_uploads_dir_format() {
        assert!(uploads_dir().ends_with("/uploads"));
    }

    #[test]
    fn test_guild_upload_path() {
        let path = guild_upload_path(Path::new("/srv/uploads"), 42, "notes.pdf");
        assert_eq!(path, PathBuf::from("/srv/uploads/42/notes.pdf"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("notes.pdf"), Some("notes.pdf".into()));
        assert_eq!(sanitize_file_name("../../etc/passwd"), Some("passwd".into()));
        assert_eq!(sanitize_file_name("C:\\docs\\week1.pdf"), Some("week1.pdf".into()));
        assert_eq!(sanitize_file_name("dir/"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name(""), None);
    }
}
