//! Configuration management for libris.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{SortKey, DEFAULT_MIN_AGE_YEARS};
use crate::error::{Error, Result};
use crate::store::DEFAULT_COLLECTION;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "libris";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "libris.db";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "LIBRIS_";

static COLLECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid regex pattern"));

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LIBRIS_`, `__` between levels)
/// 2. TOML config file at `~/.config/libris/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Catalog behaviour.
    pub catalog: CatalogConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/libris/libris.db`
    pub database_path: Option<PathBuf>,
    /// Collection holding the book documents.
    pub collection: String,
}

/// Catalog-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Minimum age in years before a book may be recommended.
    pub recommendation_min_age_years: u32,
    /// Grouping used by `list` when none is given.
    pub default_group_by: SortKey,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recommendation_min_age_years: DEFAULT_MIN_AGE_YEARS.unsigned_abs(),
            default_group_by: SortKey::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and the environment still
    /// apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
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
        if !COLLECTION_NAME.is_match(&self.storage.collection) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "collection name '{}' must be non-empty and contain only letters, digits, '_' or '-'",
                    self.storage.collection
                ),
            });
        }

        if i32::try_from(self.catalog.recommendation_min_age_years).is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "recommendation_min_age_years ({}) is too large",
                    self.catalog.recommendation_min_age_years
                ),
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
