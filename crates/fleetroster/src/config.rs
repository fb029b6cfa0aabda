//! Configuration management for fleetroster.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fleet::DEFAULT_STORAGE_KEY;
use crate::filter::WILDCARD;
use crate::vehicle::DEFAULT_IMAGE;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fleetroster";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "roster.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLEETROSTER_`, sections separated
///    by `__`, e.g. `FLEETROSTER_STORAGE__IN_MEMORY=true`)
/// 2. TOML config file at `~/.config/fleetroster/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Roster presentation configuration.
    pub fleet: FleetConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/fleetroster/roster.db`
    pub database_path: Option<PathBuf>,
    /// Key the roster is stored under.
    pub key: String,
    /// Keep the roster in memory only; nothing survives the process.
    pub in_memory: bool,
}

/// Options offered to whoever is entering vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Categories a vehicle may be filed under.
    pub categories: Vec<String>,
    /// Image URI given to newly added vehicles.
    pub default_image: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            in_memory: false,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }
}

fn default_categories() -> Vec<String> {
    vec!["Sedan".to_string(), "SUV".to_string(), "Truck".to_string()]
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
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLEETROSTER_").split("__"));

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
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if self.fleet.categories.is_empty() {
            return Err(Error::ConfigValidation {
                message: "fleet.categories must list at least one category".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for category in &self.fleet.categories {
            if category.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "fleet.categories contains a blank entry".to_string(),
                });
            }
            // "All" is the filter wildcard and cannot name a real category.
            if category.trim().eq_ignore_ascii_case(WILDCARD) {
                return Err(Error::ConfigValidation {
                    message: format!("'{category}' is reserved and cannot be a category"),
                });
            }
            if !seen.insert(category.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate category: {category}"),
                });
            }
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

    /// Check whether `category` is one of the configured options.
    #[must_use]
    pub fn is_known_category(&self, category: &str) -> bool {
        self.fleet.categories.iter().any(|c| c == category)
    }
}
