//! Application configuration module
//!
//! This module provides type-safe configuration loading using the `config`
//! and `dotenvy` crates. Values come from built-in defaults, an optional TOML
//! file, then environment variables with the `SPEC_BUILDER` prefix, where
//! nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use spec_builder::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Storing under key {}", config.storage.key);
//! ```

mod document;
mod error;
mod export;
mod logging;
mod storage;

pub use document::DocumentConfig;
pub use error::{ConfigError, ValidationError};
pub use export::{ExportConfig, HtmlRenderer};
pub use logging::{LogFormat, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;
use std::path::Path;

use crate::application::StoreSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Persistence configuration (backend, directory, key)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Export configuration (default format, HTML strategy)
    #[serde(default)]
    pub export: ExportConfig,

    /// Document defaults (section title, version)
    #[serde(default)]
    pub document: DocumentConfig,

    /// Logging configuration (level, format)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SPEC_BUILDER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SPEC_BUILDER__STORAGE__BACKEND=memory` -> `storage.backend = memory`
    /// - `SPEC_BUILDER__EXPORT__DEFAULT_FORMAT=html` -> `export.default_format = html`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], reading an optional TOML file first.
    ///
    /// Environment variables override values from the file. A missing file is
    /// not an error.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("SPEC_BUILDER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.export.validate()?;
        self.document.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Document store defaults derived from this configuration
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            storage_key: self.storage.key.clone(),
            default_section_title: self.document.default_section_title.clone(),
            default_version: self.document.default_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("SPEC_BUILDER__STORAGE__BACKEND");
        env::remove_var("SPEC_BUILDER__STORAGE__KEY");
        env::remove_var("SPEC_BUILDER__EXPORT__DEFAULT_FORMAT");
        env::remove_var("SPEC_BUILDER__LOGGING__FORMAT");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.key, "simba-specification");
        assert_eq!(config.export.default_format, "markdown");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SPEC_BUILDER__STORAGE__BACKEND", "memory");
        env::set_var("SPEC_BUILDER__STORAGE__KEY", "custom-key");
        env::set_var("SPEC_BUILDER__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.key, "custom-key");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[export]\ndefault_format = \"json\"\n\n[storage]\nkey = \"from-file\"").unwrap();
        env::set_var("SPEC_BUILDER__STORAGE__KEY", "from-env");
        let result = AppConfig::load_from(Some(file.path()));
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.export.default_format, "json");
        assert_eq!(config.storage.key, "from-env");
    }

    #[test]
    fn test_validate_rejects_bad_export_format() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SPEC_BUILDER__EXPORT__DEFAULT_FORMAT", "pdf");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_settings_follow_config() {
        let mut config = AppConfig::default();
        config.storage.key = "k".to_string();
        config.document.default_section_title = "Untitled".to_string();

        let settings = config.store_settings();

        assert_eq!(settings.storage_key, "k");
        assert_eq!(settings.default_section_title, "Untitled");
        assert_eq!(settings.default_version, "1.0.0");
    }
}
