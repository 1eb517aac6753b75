//! Configuration loading and management
//!
//! Handles parsing of `config.toml`:
//!
//! ```toml
//! [storage]
//! path = "/home/me/tasks.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! ```
//!
//! Command-line flags and `TASKPAD_*` environment variables override the
//! file; see `cli`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up in the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP shell configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the task document lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit data file; defaults to `~/.taskpad_data.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Bind address for `taskpad serve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
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
    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfig("server.host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfig("server.port must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Platform config file location (e.g. `~/.config/taskpad/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "taskpad")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load configuration from a file, failing on any problem
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, or return defaults
    ///
    /// A broken file is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Resolve configuration: an explicit path is strict, the default path lenient.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::default_path()
                .map(|path| Self::load_or_default(&path))
                .unwrap_or_default()),
        }
    }

    /// Data file to use, honoring an override before the configured path.
    pub fn data_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = self.storage.path.as_ref() {
            return Ok(path.clone());
        }
        crate::storage::default_data_path().ok_or_else(|| {
            Error::InvalidConfig(
                "no home directory found; set storage.path or TASKPAD_DATA".to_string(),
            )
        })
    }

    fn validate(&self) -> Result<()> {
        if let Some(path) = self.storage.path.as_ref() {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig("storage.path cannot be empty".to_string()));
            }
        }
        self.server.validate()
    }
}
