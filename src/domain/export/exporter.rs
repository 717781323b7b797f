//! Exporter - converts a specification to Markdown, JSON or HTML.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{panic_message, DomainError, ErrorCode};
use crate::domain::specification::{Section, Specification};
use crate::domain::templates::TemplateRegistry;

use super::html::{wrap_html, BasicMarkdownRenderer, MarkdownRenderer};
use super::markdown::{generic_section, header, table_of_contents};
use super::ExportFormat;

/// Per-section-type export override.
pub trait SectionExporter: Send + Sync {
    fn export(&self, section: &Section) -> Result<String, DomainError>;
}

impl<F> SectionExporter for F
where
    F: Fn(&Section) -> Result<String, DomainError> + Send + Sync,
{
    fn export(&self, section: &Section) -> Result<String, DomainError> {
        self(section)
    }
}

/// Produces the three export formats.
///
/// Section bodies resolve in order: a registered section exporter, then the
/// template registry, then generic field export. A failing exporter or
/// template falls back to generic export for that section only.
#[derive(Clone)]
pub struct Exporter {
    registry: Arc<TemplateRegistry>,
    section_exporters: HashMap<String, Arc<dyn SectionExporter>>,
    renderer: Arc<dyn MarkdownRenderer>,
}

impl Exporter {
    /// Exporter backed by `registry` using the basic HTML strategy.
    pub fn new(registry: Arc<TemplateRegistry>) -> Self {
        Self {
            registry,
            section_exporters: HashMap::new(),
            renderer: Arc::new(BasicMarkdownRenderer),
        }
    }

    /// Replaces the Markdown to HTML strategy.
    pub fn with_renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Registers an override for one section type, replacing any previous one.
    pub fn register_section_exporter<E>(&mut self, section_type: impl Into<String>, exporter: E)
    where
        E: SectionExporter + 'static,
    {
        let section_type = section_type.into();
        debug!(section_type = %section_type, "Registered section exporter");
        self.section_exporters.insert(section_type, Arc::new(exporter));
    }

    pub fn has_section_exporter(&self, section_type: &str) -> bool {
        self.section_exporters.contains_key(section_type)
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Formats
    // ════════════════════════════════════════════════════════════════════════════════

    /// Exports in the requested format.
    pub fn export(&self, spec: &Specification, format: ExportFormat) -> Result<String, DomainError> {
        match format {
            ExportFormat::Markdown => Ok(self.to_markdown(spec)),
            ExportFormat::Json => self.to_json(spec),
            ExportFormat::Html => Ok(self.to_html(spec)),
        }
    }

    /// Pretty-printed JSON; the inverse of `Specification::from_json`.
    pub fn to_json(&self, spec: &Specification) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(spec)?)
    }

    /// Header, table of contents, separator, then each section by `order`.
    pub fn to_markdown(&self, spec: &Specification) -> String {
        let sections = spec.sorted_sections();

        let mut markdown = header(&spec.metadata);
        markdown.push_str("\n\n");
        markdown.push_str(&table_of_contents(&sections));
        markdown.push_str("\n\n");
        markdown.push_str("---\n\n");

        for section in sections {
            markdown.push_str(&self.export_section(section));
            markdown.push_str("\n\n");
        }

        markdown.trim().to_string()
    }

    /// The Markdown export converted by the configured renderer and wrapped in
    /// a page shell.
    pub fn to_html(&self, spec: &Specification) -> String {
        let markdown = self.to_markdown(spec);
        let body = self.renderer.render(&markdown);
        wrap_html(&body, &spec.metadata.title)
    }

    /// Body of one section.
    pub fn export_section(&self, section: &Section) -> String {
        if let Some(exporter) = self.section_exporters.get(&section.section_type) {
            match guarded(|| exporter.export(section)) {
                Ok(markdown) => return markdown,
                Err(err) => warn!(
                    section_type = %section.section_type,
                    section_id = %section.id,
                    error = %err,
                    "Section exporter failed, using default export"
                ),
            }
        }

        if self.registry.has_template(&section.section_type) {
            let data = section.render_data();
            match guarded(|| self.registry.render(&section.section_type, &data)) {
                Ok(markdown) => return markdown,
                Err(err) => warn!(
                    section_type = %section.section_type,
                    section_id = %section.id,
                    error = %err,
                    "Template render failed, using default export"
                ),
            }
        }

        generic_section(section)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(Arc::new(TemplateRegistry::new()))
    }
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("templates", &self.registry.template_count())
            .field(
                "section_exporters",
                &self.section_exporters.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Runs a render call, converting a panic into `RenderFailed`.
fn guarded<F>(render: F) -> Result<String, DomainError>
where
    F: FnOnce() -> Result<String, DomainError>,
{
    catch_unwind(AssertUnwindSafe(render)).unwrap_or_else(|payload| {
        Err(DomainError::new(
            ErrorCode::RenderFailed,
            panic_message(payload.as_ref()),
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
