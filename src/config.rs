//! Configuration management for course search
//!
//! Configuration is read from a TOML file, with environment variable
//! overrides and sensible defaults:
//!
//! ```toml
//! [catalog]
//! path = "public/FastCourses.json"
//!
//! [search]
//! parallel_threshold = 4096
//! max_results = 200
//!
//! [logging]
//! log_level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::query::DEFAULT_PARALLEL_THRESHOLD;

/// Environment variable naming the catalog file
pub const ENV_CATALOG: &str = "COURSE_FILTER_CATALOG";

/// Environment variable overriding the parallel threshold
pub const ENV_PARALLEL_THRESHOLD: &str = "COURSE_FILTER_PARALLEL_THRESHOLD";

/// Environment variable overriding the result limit
pub const ENV_MAX_RESULTS: &str = "COURSE_FILTER_MAX_RESULTS";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Path to the catalog JSON document
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Minimum catalog size before filtering runs in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Maximum rows returned to callers (0 = unlimited)
    #[serde(default)]
    pub max_results: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace) or an EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_catalog_path() -> PathBuf { PathBuf::from("FastCourses.json") }
fn default_parallel_threshold() -> usize { DEFAULT_PARALLEL_THRESHOLD }
fn default_log_level() -> String { "info".to_string() }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            max_results: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides
    ///
    /// Unparsable numeric values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(ENV_CATALOG) {
            self.catalog.path = PathBuf::from(path);
        }

        if let Ok(threshold) = std::env::var(ENV_PARALLEL_THRESHOLD) {
            if let Ok(t) = threshold.parse() {
                self.search.parallel_threshold = t;
            }
        }
        if let Ok(max) = std::env::var(ENV_MAX_RESULTS) {
            if let Ok(m) = max.parse() {
                self.search.max_results = m;
            }
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.logging.log_level = log_level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Catalog path cannot be empty".to_string(),
            ));
        }

        if self.logging.log_level.trim().is_empty() {
            return Err(Error::Configuration(
                "Log level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents).map_err(|e| {
            Error::Configuration(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.path, PathBuf::from("FastCourses.json"));
        assert_eq!(config.search.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.search.max_results, 0);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_catalog_path_invalid() {
        let mut config = Config::default();
        config.catalog.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [search]
            max_results = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.search.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course-filter.toml");

        let mut config = Config::default();
        config.catalog.path = PathBuf::from("/srv/catalog.json");
        config.search.max_results = 25;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/course-filter.toml"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var(ENV_PARALLEL_THRESHOLD, "17");
        let config = Config::from_env();
        assert_eq!(config.search.parallel_threshold, 17);
        std::env::remove_var(ENV_PARALLEL_THRESHOLD);
    }
}
