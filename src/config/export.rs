//! Export configuration

use serde::Deserialize;

use crate::domain::export::ExportFormat;

use super::error::ValidationError;

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Format used when the caller does not name one
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Markdown to HTML strategy
    #[serde(default)]
    pub html_renderer: HtmlRenderer,
}

/// Markdown to HTML strategy
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HtmlRenderer {
    /// Built-in approximate converter
    #[default]
    Basic,
    /// pulldown-cmark
    Pulldown,
}

impl ExportConfig {
    /// Parsed default format
    pub fn format(&self) -> Result<ExportFormat, ValidationError> {
        self.default_format
            .parse()
            .map_err(|_| ValidationError::UnsupportedExportFormat(self.default_format.clone()))
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.format().map(|_| ())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            html_renderer: HtmlRenderer::default(),
        }
    }
}

fn default_format() -> String {
    "markdown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.format(), Ok(ExportFormat::Markdown));
        assert_eq!(config.html_renderer, HtmlRenderer::Basic);
    }

    #[test]
    fn test_unknown_default_format_rejected() {
        let config = ExportConfig {
            default_format: "docx".to_string(),
            ..ExportConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnsupportedExportFormat("docx".to_string()))
        );
    }
}
