//! Configuration management for sportsz.
//!
//! Configuration is layered with figment: built-in defaults, then a TOML file,
//! then `SPORTSZ_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notify::Permission;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "sportsz";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "sportsz.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (`SPORTSZ_<SECTION>__<KEY>`)
/// 2. TOML config file at `~/.config/sportsz/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// History and chart configuration.
    pub analytics: AnalyticsConfig,
    /// Video upload rules.
    pub video: VideoConfig,
    /// Reminder notifications.
    pub notifications: NotificationConfig,
}

/// Which storage backend to persist collections in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// On-disk `SQLite` database.
    #[default]
    Sqlite,
    /// Process-local map, discarded on exit.
    Memory,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/sportsz/sportsz.db`
    pub database_path: Option<PathBuf>,
    /// Backend to use.
    pub backend: BackendKind,
}

/// History and chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of recent runs shown in the chart.
    pub chart_window: usize,
    /// Number of recent records shown as badges.
    pub badge_count: usize,
}

/// Video upload rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Uploads shorter than this are rejected.
    pub min_duration_seconds: f64,
}

/// Reminder notification configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Starting permission state for the terminal notifier.
    pub permission: Permission,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            chart_window: 12,
            badge_count: 5,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            min_duration_seconds: 1.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SPORTSZ_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.analytics.chart_window == 0 {
            return Err(Error::ConfigValidation {
                message: "chart_window must be greater than 0".to_string(),
            });
        }

        let min = self.video.min_duration_seconds;
        if !min.is_finite() || min < 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("min_duration_seconds must be a non-negative number, got {min}"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
