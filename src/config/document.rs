//! Document defaults configuration

use serde::Deserialize;

use crate::application::DEFAULT_SECTION_TITLE;
use crate::domain::specification::DEFAULT_VERSION;

use super::error::ValidationError;

/// Defaults applied to new documents and sections
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Title for sections created without one
    #[serde(default = "default_section_title")]
    pub default_section_title: String,

    /// Version for freshly created specifications
    #[serde(default = "default_version")]
    pub default_version: String,
}

impl DocumentConfig {
    /// Validate document configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_version.trim().is_empty() {
            return Err(ValidationError::MissingRequired("document.default_version"));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            default_section_title: default_section_title(),
            default_version: default_version(),
        }
    }
}

fn default_section_title() -> String {
    DEFAULT_SECTION_TITLE.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}
