//! Application configuration.
//!
//! Every setting is resolved with the same priority:
//! `config.toml` > environment (`.env` is loaded first) > built-in default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    server: Option<ServerConfig>,
    storage: Option<StorageConfig>,
    content: Option<ContentConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerConfig {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageConfig {
    backend: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentConfig {
    dir: Option<String>,
}

// ==================== Resolved Settings ====================

/// Where learner progress is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_addr: String,
    pub server_port: u16,
    pub storage: StorageBackend,
    pub content_dir: PathBuf,
}

impl Settings {
    /// Load settings from `config.toml` in the working directory and the
    /// process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = std::fs::read_to_string(CONFIG_FILE).ok();
        Self::resolve(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from optional config.toml contents and an environment
    /// lookup
    pub fn resolve(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let config = match file.map(toml::from_str::<AppConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
                AppConfig::default()
            }
            None => AppConfig::default(),
        };
        let server = config.server.unwrap_or_default();
        let storage = config.storage.unwrap_or_default();
        let content = config.content.unwrap_or_default();

        let server_addr = pick("server address", server.addr, env("SERVER_ADDR"))
            .unwrap_or_else(|| SERVER_ADDR.to_string());

        let env_port = env("PORT").and_then(|p| match p.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!("Ignoring invalid PORT value: {}", p);
                None
            }
        });
        let server_port = pick("server port", server.port, env_port).unwrap_or(SERVER_PORT);

        let backend = pick("storage backend", storage.backend, env("STORAGE_BACKEND"));
        let storage = match backend.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("memory") => StorageBackend::Memory,
            other => {
                if let Some(unknown) = other.filter(|b| *b != "sqlite") {
                    tracing::warn!("Unknown storage backend '{}', using sqlite", unknown);
                }
                let path = pick("database", storage.path, env("DATABASE_PATH"))
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(paths::db_path()));
                StorageBackend::Sqlite(path)
            }
        };

        let content_dir = pick("content directory", content.dir, env("CONTENT_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::topics_dir()));

        Self {
            server_addr,
            server_port,
            storage,
            content_dir,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

/// First of file value, then env value; logs where the value came from
fn pick<T: std::fmt::Display>(what: &str, file: Option<T>, env: Option<T>) -> Option<T> {
    if let Some(value) = file {
        tracing::info!("Using {} from {}: {}", what, CONFIG_FILE, value);
        return Some(value);
    }
    if let Some(value) = env {
        tracing::info!("Using {} from env: {}", what, value);
        return Some(value);
    }
    None
}

pub const CONFIG_FILE: &str = "config.toml";

// ==================== Server Configuration ====================

/// Default address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 2;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session start
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;
