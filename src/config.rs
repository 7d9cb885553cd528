//! Configuration for genmave

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("genmave")
}

/// Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the SQLite database and config.toml
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum pooled SQLite connections
    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,

    /// Offset from UTC, in minutes, used for journal calendar days
    /// (420 = WIB / UTC+7)
    #[serde(default)]
    pub journal_utc_offset_minutes: i32,

    /// Principals allowed to read platform metrics
    #[serde(default)]
    pub admin_user_ids: Vec<String>,

    /// Default trailing window for admin metrics
    #[serde(default = "default_admin_window_days")]
    pub admin_window_days: u32,
}

fn default_http_port() -> u16 {
    8095
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_pool_size() -> u32 {
    8
}

fn default_admin_window_days() -> u32 {
    7
}

/// Command-line values that win over the file for a single run
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub http_port: Option<u16>,
    pub bind_address: Option<String>,
    pub admin_user_ids: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            db_pool_size: default_pool_size(),
            journal_utc_offset_minutes: 0,
            admin_user_ids: Vec::new(),
            admin_window_days: default_admin_window_days(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get config file path
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Load `file` (or defaults), write `config.toml` into the data directory
    /// on first run, then apply the run-only overrides.
    ///
    /// Only the data directory override is part of the written file.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self, std::io::Error> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = overrides.data_dir {
            config.data_dir = dir;
        }

        std::fs::create_dir_all(&config.data_dir)?;
        let config_path = config.config_path();
        if !config_path.exists() {
            config.save(&config_path)?;
            info!(path = %config_path.display(), "Created default config");
        }

        if let Some(port) = overrides.http_port {
            config.http_port = port;
        }
        if let Some(addr) = overrides.bind_address {
            config.bind_address = addr;
        }
        config.admin_user_ids.extend(overrides.admin_user_ids);
        Ok(config)
    }
}
