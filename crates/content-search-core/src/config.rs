//! Content search configuration.
//!
//! Provides configuration file support via `content-search.toml` and environment
//! variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`CONTENT_SEARCH_*`, sections separated by `__`, e.g.
//!    `CONTENT_SEARCH_SEARCH__MAX_LIMIT=50`)
//! 2. Configuration file (`content-search.toml`)
//! 3. Default values
//!
//! Field definitions live in the file as `[[fields]]` tables:
//!
//! ```toml
//! [[fields]]
//! content_type = "folder"
//! identifier = "name"
//! kind = "string"
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::field_registry::{FieldDefinition, FieldRegistry};
use crate::handler::CommitMode;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "content-search.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Search configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hard cap on page size; also the page size of queries without a limit.
    pub max_limit: usize,
    /// Budget for one backend call in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_limit: 1000,
            request_timeout_ms: 5000,
        }
    }
}

/// Indexing configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Commit mode used when callers take the handler's default.
    pub commit_mode: CommitMode,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSearchConfig {
    /// Search configuration.
    pub search: SearchConfig,
    /// Indexing configuration.
    pub indexing: IndexingConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Searchable field definitions.
    pub fields: Vec<FieldDefinition>,
}

impl ContentSearchConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables. A missing
    /// `content-search.toml` is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::layered(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads configuration from a specific file path.
    ///
    /// Unlike [`ContentSearchConfig::load`], the file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the path does not exist,
    /// [`ConfigError::IoError`] if its existence cannot be checked, and
    /// [`ConfigError::ParseError`] if parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.try_exists()? {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Self::layered(path)
    }

    fn layered(path: &Path) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CONTENT_SEARCH_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_limit == 0 || self.search.max_limit > 100_000 {
            return Err(ConfigError::InvalidValue {
                key: "search.max_limit".to_string(),
                message: format!(
                    "value {} is out of range [1, 100000]",
                    self.search.max_limit
                ),
            });
        }

        if self.search.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "search.request_timeout_ms".to_string(),
                message: "value must be > 0".to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        let mut seen = FxHashSet::default();
        for field in &self.fields {
            if field.content_type.is_empty() || field.identifier.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "fields".to_string(),
                    message: "content_type and identifier must not be empty".to_string(),
                });
            }
            if !seen.insert((field.content_type.as_str(), field.identifier.as_str())) {
                return Err(ConfigError::InvalidValue {
                    key: "fields".to_string(),
                    message: format!(
                        "field '{}/{}' is defined more than once",
                        field.content_type, field.identifier
                    ),
                });
            }
        }

        Ok(())
    }

    /// Builds the field registry from the `fields` section.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] for duplicate or incomplete definitions.
    pub fn field_registry(&self) -> crate::Result<FieldRegistry> {
        FieldRegistry::from_definitions(self.fields.iter().cloned())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
