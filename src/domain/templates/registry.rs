//! Template registry - named section templates and reusable blocks.

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::foundation::DomainError;
use crate::domain::specification::{ContentMap, ContentValue};

use super::{defaults, Block, FieldType, Template};

/// Fence language for `code` fields that do not declare one.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Lookup and rendering store for templates and blocks.
///
/// Constructed explicitly and shared by reference with the exporter and the
/// document store; there is no ambient global registry.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, Template>,
    blocks: IndexMap<String, Block>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the built-in templates and blocks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        defaults::register_default_templates(&mut registry);
        defaults::register_default_blocks(&mut registry);
        registry
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Registration
    // ════════════════════════════════════════════════════════════════════════════════

    /// Inserts or overwrites a template. The definition is not checked for consistency.
    pub fn register_template(&mut self, id: impl Into<String>, mut template: Template) {
        let id = id.into();
        template.id = id.clone();
        debug!(template_id = %id, "registering template");
        self.templates.insert(id, template);
    }

    /// Inserts or overwrites a block.
    pub fn register_block(&mut self, id: impl Into<String>, mut block: Block) {
        let id = id.into();
        block.id = id.clone();
        debug!(block_id = %id, "registering block");
        self.blocks.insert(id, block);
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Lookup
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn get_template(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn get_block(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn has_block(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// All templates in registration order, optionally restricted to one category.
    pub fn get_all_templates(&self, category: Option<&str>) -> Vec<&Template> {
        self.templates
            .values()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .collect()
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn get_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for template in self.templates.values() {
            let category = template.category.as_str();
            if !category.is_empty() && !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Rendering
    // ════════════════════════════════════════════════════════════════════════════════

    /// Renders data through a template.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` when `template_id` is unregistered; otherwise whatever
    /// a custom renderer returns.
    pub fn render(&self, template_id: &str, data: &ContentMap) -> Result<String, DomainError> {
        let template = self
            .get_template(template_id)
            .ok_or_else(|| DomainError::template_not_found(template_id))?;

        match &template.renderer {
            Some(renderer) => renderer.render(data),
            None => Ok(render_default(template, data)),
        }
    }

    /// Invokes a block's render function.
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when `block_id` is unregistered.
    pub fn render_block(&self, block_id: &str, data: &ContentMap) -> Result<String, DomainError> {
        let block = self
            .get_block(block_id)
            .ok_or_else(|| DomainError::block_not_found(block_id))?;

        block.renderer.render(data)
    }
}

/// Field-driven rendering for templates without a custom renderer.
///
/// Falsy or absent values are skipped silently.
fn render_default(template: &Template, data: &ContentMap) -> String {
    let heading = match data.get("title") {
        Some(title) if title.is_truthy() => title.to_string(),
        _ => template.name.clone(),
    };
    let mut output = format!("## {}\n\n", heading);

    for (name, field) in &template.fields {
        let value = match data.get(name) {
            Some(value) if value.is_truthy() => value,
            _ => continue,
        };

        match &field.field_type {
            FieldType::Text | FieldType::Textarea => {
                output.push_str(&format!("### {}\n{}\n\n", field.label, value));
            }
            FieldType::List => {
                output.push_str(&format!("### {}\n", field.label));
                if let ContentValue::List(items) = value {
                    for item in items {
                        output.push_str(&format!("- {}\n", item));
                    }
                }
                output.push('\n');
            }
            FieldType::Code => {
                let language = field.language.as_deref().unwrap_or(DEFAULT_CODE_LANGUAGE);
                output.push_str(&format!(
                    "### {}\n```{}\n{}\n```\n\n",
                    field.label, language, value
                ));
            }
            FieldType::Other(_) => {
                output.push_str(&format!("{}\n\n", value));
            }
        }
    }

    output
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::specification::content_map;
    use crate::domain::templates::FieldDescriptor;
    use serde_json::json;

    fn tools_template() -> Template {
        Template::new("Tools System")
            .category("system")
            .field("title", FieldDescriptor::text("Title").required())
            .field("architecture", FieldDescriptor::textarea("Architecture"))
            .field("providers", FieldDescriptor::list("Providers"))
            .field("configuration", FieldDescriptor::code("Configuration", "yaml"))
            .field("snippet", FieldDescriptor::new(FieldType::Code, "Snippet"))
            .field("raw", FieldDescriptor::new(FieldType::parse("diagram"), "Raw"))
    }

    // ───────────────────────────────────────────────────────────────
    // Registration
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn register_assigns_id_and_overwrites() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        registry.register_template("tools", Template::new("Replaced"));

        let template = registry.get_template("tools").unwrap();
        assert_eq!(template.id, "tools");
        assert_eq!(template.name, "Replaced");
        assert_eq!(registry.template_count(), 1);
    }

    #[test]
    fn get_all_templates_filters_by_category() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("a", Template::new("A").category("core"));
        registry.register_template("b", Template::new("B").category("ai"));
        registry.register_template("c", Template::new("C").category("core"));

        assert_eq!(registry.get_all_templates(None).len(), 3);
        let core: Vec<&str> = registry
            .get_all_templates(Some("core"))
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(core, vec!["a", "c"]);
    }

    #[test]
    fn get_categories_is_distinct_and_skips_empty() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("a", Template::new("A").category("core"));
        registry.register_template("b", Template::new("B").category("ai"));
        registry.register_template("c", Template::new("C").category("core"));
        registry.register_template("d", Template::new("D"));

        assert_eq!(registry.get_categories(), vec!["core", "ai"]);
    }

    // ───────────────────────────────────────────────────────────────
    // Default rendering
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn render_unknown_template_is_not_found() {
        let registry = TemplateRegistry::new();

        let err = registry.render("missing", &ContentMap::new()).unwrap_err();

        assert_eq!(err.code, ErrorCode::TemplateNotFound);
    }

    #[test]
    fn render_default_follows_field_declaration_order() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        let data = content_map(json!({
            "configuration": "providers: []",
            "providers": ["openai", "anthropic"],
            "title": "Tooling",
            "architecture": "Pluggable"
        }));

        let output = registry.render("tools", &data).unwrap();

        assert_eq!(
            output,
            "## Tooling\n\n\
             ### Title\nTooling\n\n\
             ### Architecture\nPluggable\n\n\
             ### Providers\n- openai\n- anthropic\n\n\
             ### Configuration\n```yaml\nproviders: []\n```\n\n"
        );
    }

    #[test]
    fn render_default_skips_falsy_values() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        let data = content_map(json!({"architecture": "", "providers": null}));

        let output = registry.render("tools", &data).unwrap();

        assert_eq!(output, "## Tools System\n\n");
    }

    #[test]
    fn render_default_code_without_language_uses_javascript() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        let data = content_map(json!({"snippet": "let x = 1;"}));

        let output = registry.render("tools", &data).unwrap();

        assert!(output.contains("### Snippet\n```javascript\nlet x = 1;\n```\n\n"));
    }

    #[test]
    fn render_default_list_with_scalar_renders_heading_only() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        let data = content_map(json!({"providers": "just one"}));

        let output = registry.render("tools", &data).unwrap();

        assert!(output.ends_with("### Providers\n\n"));
        assert!(!output.contains("just one"));
    }

    #[test]
    fn render_default_unknown_field_type_is_verbatim() {
        let mut registry = TemplateRegistry::new();
        registry.register_template("tools", tools_template());
        let data = content_map(json!({"raw": "A --> B"}));

        let output = registry.render("tools", &data).unwrap();

        assert_eq!(output, "## Tools System\n\nA --> B\n\n");
    }

    #[test]
    fn render_delegates_to_custom_renderer() {
        let mut registry = TemplateRegistry::new();
        registry.register_template(
            "custom",
            Template::new("Custom")
                .field("ignored", FieldDescriptor::text("Ignored"))
                .with_renderer(|data| Ok(format!("custom:{}", data.len()))),
        );

        let output = registry
            .render("custom", &content_map(json!({"ignored": "x"})))
            .unwrap();

        assert_eq!(output, "custom:1");
    }

    // ───────────────────────────────────────────────────────────────
    // Blocks
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn render_block_invokes_block() {
        let mut registry = TemplateRegistry::new();
        registry.register_block("shout", Block::new("Shout", |data| {
            Ok(data
                .get("text")
                .and_then(ContentValue::as_str)
                .unwrap_or_default()
                .to_uppercase())
        }));

        let output = registry
            .render_block("shout", &content_map(json!({"text": "hi"})))
            .unwrap();

        assert_eq!(output, "HI");
        assert!(registry.has_block("shout"));
    }

    #[test]
    fn render_unknown_block_is_not_found() {
        let registry = TemplateRegistry::new();

        let err = registry.render_block("nope", &ContentMap::new()).unwrap_err();

        assert_eq!(err.code, ErrorCode::BlockNotFound);
    }
}
