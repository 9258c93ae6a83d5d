//! Configuration module
//!
//! TOML configuration loaded from `~/.config/rdv-service/config.toml`
//! (overridable with the `RDV_CONFIG` environment variable). Every
//! section falls back to its defaults when absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub scheduling: SchedulingConfig,
    pub notifications: NotificationsConfig,
    /// Technician directory seed (id → display name)
    pub technicians: Vec<TechnicianEntry>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Graceful shutdown timeout, seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file path
    pub path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "./rdv.db".to_string(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing env-filter directive, e.g. "info" or "sav_rdv=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Scheduling maintenance configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Enable the stale-slot purge task
    pub purge_enabled: bool,
    pub purge_interval_secs: u64,
    /// Unreserved slots ended longer ago than this are purged
    pub purge_retention_days: i64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            purge_enabled: false,
            purge_interval_secs: 3600,
            purge_retention_days: 30,
        }
    }
}

/// Notification bus configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Broadcast channel capacity
    pub bus_capacity: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { bus_capacity: 1024 }
    }
}

/// One technician directory entry
#[derive(Debug, Clone, Deserialize)]
pub struct TechnicianEntry {
    pub id: i64,
    pub name: String,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Default config location: `<config dir>/rdv-service/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("rdv-service").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

// ── Tests ──────────────────────────────────────────────────────
