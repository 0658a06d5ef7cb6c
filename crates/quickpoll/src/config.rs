//! Configuration management for quickpoll.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "quickpoll";

/// Default ledger file name.
const LEDGER_FILE_NAME: &str = "votes.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `QUICKPOLL_`, sections split on `__`)
/// 2. TOML config file at `~/.config/quickpoll/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Poll server configuration.
    pub api: ApiConfig,
    /// Local vote ledger configuration.
    pub storage: StorageConfig,
    /// Results view configuration.
    pub results: ResultsConfig,
    /// Share link configuration.
    pub share: ShareConfig,
}

/// Poll server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST API.
    pub base_url: String,
    /// Base URL of the server hosting the legacy `/create_poll` endpoint.
    pub legacy_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Local vote ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the ledger file.
    /// Defaults to `~/.local/share/quickpoll/votes.db`
    pub ledger_path: Option<PathBuf>,
}

/// Results view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Seconds between refreshes when watching results.
    pub refresh_interval_secs: u64,
    /// Width of a full result bar, in characters.
    pub bar_width: usize,
}

/// Share link configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Origin of the web front end that share links point at.
    pub origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            legacy_base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            bar_width: 40,
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
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
            .merge(Env::prefixed("QUICKPOLL_").split("__"));

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
        for (name, url) in [
            ("api.base_url", &self.api.base_url),
            ("api.legacy_base_url", &self.api.legacy_base_url),
            ("share.origin", &self.share.origin),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be an http(s) URL, got '{url}'"),
                });
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.results.refresh_interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "refresh_interval_secs must be greater than 0".to_string(),
            });
        }

        if self.results.bar_width == 0 {
            return Err(Error::ConfigValidation {
                message: "bar_width must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the ledger path, resolving defaults if not set.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.storage
            .ledger_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LEDGER_FILE_NAME))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Get the results refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.results.refresh_interval_secs)
    }
}
