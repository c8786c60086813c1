//! Project path functions - single source of truth for default file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! Explicit `DATABASE_PATH` / `CONTENT_DIR` settings (see config.rs) take
//! precedence over these defaults.

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite progress database path
pub fn db_path() -> String {
    format!("{}/progress.db", data_dir())
}

/// Topic deck directory
pub fn topics_dir() -> String {
    format!("{}/topics", data_dir())
}
