//! Standalone validation of a single section.

use crate::domain::specification::Section;
use crate::domain::templates::Template;

use super::{Finding, ValidationReport};

/// Rule name carried by structural findings.
pub const SECTION_STRUCTURE: &str = "section-structure";

/// Rule name carried by template-conformance findings.
pub const SECTION_TEMPLATE: &str = "section-template";

/// Checks one section in isolation, without the engine's rule set.
///
/// Missing `id`, `type` or a blank `title` are errors, as is missing content
/// when a template is supplied. Required template fields absent from the
/// content are warnings; the `title` field is satisfied by the section title.
pub fn validate_section(section: &Section, template: Option<&Template>) -> ValidationReport {
    let mut findings = Vec::new();

    if section.id.is_empty() {
        findings.push(Finding::error("id", "Section ID is required").with_rule(SECTION_STRUCTURE));
    }

    if section.section_type.trim().is_empty() {
        findings.push(
            Finding::error("type", "Section type is required").with_rule(SECTION_STRUCTURE),
        );
    }

    if section.title.trim().is_empty() {
        findings.push(
            Finding::error("title", "Section title is required").with_rule(SECTION_STRUCTURE),
        );
    }

    if let Some(template) = template {
        match &section.content {
            None => findings.push(
                Finding::error("content", "Section content is required").with_rule(SECTION_TEMPLATE),
            ),
            Some(content) => {
                for field in template.required_fields().filter(|f| *f != "title") {
                    let present = content.get(field).map_or(false, |v| v.is_truthy());
                    if !present {
                        findings.push(
                            Finding::warning(
                                format!("content.{}", field),
                                format!("Required field missing: {}", field),
                            )
                            .with_rule(SECTION_TEMPLATE),
                        );
                    }
                }
            }
        }
    }

    ValidationReport::from_findings(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SectionId, Timestamp};
    use crate::domain::specification::content_map;
    use crate::domain::templates::TemplateRegistry;
    use serde_json::json;

    fn section() -> Section {
        let at = Timestamp::from_unix_millis(0);
        Section {
            id: SectionId::from_raw("section-1-0"),
            section_type: "system-overview".to_string(),
            title: "Overview".to_string(),
            order: 0,
            content: Some(content_map(json!({"description": "What it is"}))),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn complete_section_is_valid() {
        let registry = TemplateRegistry::with_defaults();
        let report = validate_section(&section(), registry.get_template("system-overview"));

        assert!(report.valid);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn missing_structure_is_reported_per_field() {
        let mut section = section();
        section.id = SectionId::default();
        section.section_type = String::new();
        section.title = "  ".to_string();

        let report = validate_section(&section, None);
        let fields: Vec<&str> = report.findings.iter().filter_map(|f| f.field.as_deref()).collect();

        assert!(!report.valid);
        assert_eq!(fields, vec!["id", "type", "title"]);
    }

    #[test]
    fn missing_content_is_error_only_with_template() {
        let mut section = section();
        section.content = None;

        assert!(validate_section(&section, None).valid);

        let registry = TemplateRegistry::with_defaults();
        let report = validate_section(&section, registry.get_template("system-overview"));
        assert!(!report.valid);
        assert_eq!(report.findings[0].field.as_deref(), Some("content"));
    }

    #[test]
    fn absent_required_template_field_is_warning() {
        let mut section = section();
        section.content = Some(content_map(json!({"features": ["a"]})));

        let registry = TemplateRegistry::with_defaults();
        let report = validate_section(&section, registry.get_template("system-overview"));

        assert!(report.valid);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.findings[0].field.as_deref(), Some("content.description"));
        assert_eq!(report.findings[0].rule, SECTION_TEMPLATE);
    }
}
