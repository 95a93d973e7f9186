//! Bootstrap configuration loading and data directory resolution
//!
//! The TOML file only covers what the server needs before any model data is
//! read: where the data lives, where to listen, and logging. View
//! preferences live in [`crate::vis::VisConfig`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "TMB_DATA_DIR";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding info.json, meta.csv, dt.json, tw.json, doc_len.json
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bind: default_bind(),
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file location: `<config_dir>/tmb/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tmb").join("config.toml"))
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load bootstrap configuration
///
/// An explicit path must exist and parse. Without one, the platform default
/// location is tried; a missing file there is not an error and yields the
/// built-in defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let config = read_toml_config(path)?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = read_toml_config(&path)?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!("No config file at {}; using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory; using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Data directory resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. `./data`
pub fn resolve_data_dir(cli_arg: Option<&Path>, env_var_name: &str, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.data_dir {
        return path.clone();
    }

    PathBuf::from("data")
}
