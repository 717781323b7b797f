//! Persistence configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::DEFAULT_STORAGE_KEY;

use super::error::ValidationError;

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which key-value store backs the document store
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Key the specification is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

/// Key-value store implementation
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("storage.key"));
        }
        if self.backend == StorageBackend::File && self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.path"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            key: default_key(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::File);
        assert_eq!(config.path, PathBuf::from("./data"));
        assert_eq!(config.key, "simba-specification");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = StorageConfig {
            key: " ".to_string(),
            ..StorageConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.key"))
        );
    }

    #[test]
    fn test_empty_path_only_matters_for_file_backend() {
        let mut config = StorageConfig {
            path: PathBuf::new(),
            ..StorageConfig::default()
        };
        assert!(config.validate().is_err());

        config.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }
}
