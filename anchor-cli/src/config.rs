//! Configuration file loading and management
//!
//! This module handles loading and parsing the configuration from
//! `$XDG_CONFIG_HOME/anchor/config.toml`. If the configuration file doesn't
//! exist, a default configuration is created with documented comments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where bookmarks live and how they are synchronized
    #[serde(default)]
    pub storage: StorageConfig,
    /// Page fetching
    #[serde(default)]
    pub http: HttpConfig,
    /// Diagnostics
    #[serde(default)]
    pub log: LogConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Plain directory
    #[default]
    Local,
    /// Directory tracked by a git repository
    Git,
}

/// When the backend is synchronized around a command
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Update before every command and store after every change
    #[default]
    Always,
    /// Only `init` touches the backend
    Never,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Default: "local"
    #[serde(default)]
    pub kind: StorageKind,
    /// Default: "always"
    #[serde(default)]
    pub sync_mode: SyncMode,
    /// Root data directory
    /// If None, uses XDG_DATA_HOME/anchor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Archived page snapshots
    /// If None, uses <data_dir>/.archive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_dir: Option<PathBuf>,
    /// Git remote, only used by the git backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    /// Request timeout in seconds
    /// Default: 3
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "warn"
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 3 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, first writing the documented default
    /// file there if none exists.
    ///
    /// The flag tells whether the file was created. Logging is not set up yet
    /// when this runs, so reporting it is left to the caller.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<(Self, bool)> {
        let path = path.as_ref();
        let created = !path.exists();

        if created {
            Self::create_default_file(path)?;
        }

        Ok((Self::load(path)?, created))
    }

    /// Returns `$XDG_CONFIG_HOME/anchor/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r#"# anchor configuration

[storage]
# Storage backend: "local" or "git"
# Default: "local"
kind = "local"

# "always" pulls before every command and commits after every change,
# "never" leaves synchronization to you.
# Default: "always"
sync_mode = "always"

# Root data directory
# If not specified, defaults to $XDG_DATA_HOME/anchor
# data_dir = "/path/to/bookmarks"

# Archived page snapshots
# If not specified, defaults to <data_dir>/.archive
# archive_dir = "/path/to/archive"

# Remote repository for the git backend
# remote = "git@github.com:user/bookmarks.git"

[http]
# Timeout for fetching page titles and snapshots
# Default: 3
timeout_secs = 3

[log]
# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set.
# Default: "warn"
level = "warn"
"#
    }

    /// Ensures all configuration values are valid and within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.log.level,
                valid_log_levels.join(", ")
            );
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than 0");
        }

        if self.storage.kind == StorageKind::Local && self.storage.remote.is_some() {
            tracing::warn!("storage.remote is ignored by the local backend");
        }

        Ok(())
    }

    /// The configured data directory or the default XDG data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.storage.data_dir {
            return Ok(path.clone());
        }

        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// The configured archive directory or `<data_dir>/.archive`
    pub fn archive_dir(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.storage.archive_dir {
            return Ok(path.clone());
        }

        Ok(self.data_dir()?.join(".archive"))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "anchor").context("Failed to determine project directories")
}
