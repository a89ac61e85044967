//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    2112
}

/// Where job records and saved templates live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

impl StorageConfig {
    /// Root of the live-job namespace.
    pub fn jobs_dir(&self) -> PathBuf {
        self.dir.join("jobs")
    }

    /// Root of the saved-template namespace.
    pub fn saved_dir(&self) -> PathBuf {
        self.dir.join("saved")
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("shhttp")
}

/// Execution engine behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Re-run jobs left in progress or queued by the previous process
    /// instead of marking them failed.
    #[serde(default)]
    pub revive: bool,

    /// Hours between sweeps of finished jobs. Absent or 0 disables cleanup.
    #[serde(default)]
    pub clean_interval_hours: Option<u64>,
}

/// Longest accepted sweep interval, one hundred years.
pub const MAX_CLEAN_INTERVAL_HOURS: u64 = 100 * 365 * 24;

impl EngineConfig {
    /// The sweep period, or `None` when cleanup is disabled or the hour
    /// count does not fit in a [`Duration`] of seconds.
    pub fn clean_interval(&self) -> Option<Duration> {
        self.clean_interval_hours
            .filter(|h| *h > 0)
            .and_then(|h| h.checked_mul(3600))
            .map(Duration::from_secs)
    }
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Console only when absent.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
