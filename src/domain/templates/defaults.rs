//! Built-in section templates and reusable blocks.

use crate::domain::specification::{ContentMap, ContentValue};

use super::{Block, FieldDescriptor, Template, TemplateRegistry, DEFAULT_CODE_LANGUAGE};

pub(super) fn register_default_templates(registry: &mut TemplateRegistry) {
    registry.register_template(
        "system-overview",
        Template::new("Sistema de Asistentes Múltiples")
            .icon("🤖")
            .category("core")
            .field("title", FieldDescriptor::text("Título").required())
            .field("description", FieldDescriptor::textarea("Descripción").required())
            .field("features", FieldDescriptor::list("Características Principales")),
    );

    registry.register_template(
        "features",
        Template::new("Gestión de Conversaciones")
            .icon("💬")
            .category("core")
            .field("title", FieldDescriptor::text("Título").required())
            .field("subtitle", FieldDescriptor::text("Subtítulo"))
            .field("features", FieldDescriptor::list("Features")),
    );

    registry.register_template(
        "rag-system",
        Template::new("Sistema RAG")
            .icon("🔍")
            .category("ai")
            .field("title", FieldDescriptor::text("Título").required())
            .field("ragDescription", FieldDescriptor::textarea("¿Qué es RAG?"))
            .field("searchSteps", FieldDescriptor::list("Pasos de Búsqueda"))
            .field("sources", FieldDescriptor::list("Fuentes de Datos")),
    );

    registry.register_template(
        "tools-dynamic",
        Template::new("Sistema de Herramientas")
            .icon("🛠️")
            .category("system")
            .field("title", FieldDescriptor::text("Título").required())
            .field("architecture", FieldDescriptor::textarea("Arquitectura"))
            .field("providers", FieldDescriptor::list("Providers Disponibles"))
            .field(
                "configuration",
                FieldDescriptor::code("Configuración YAML", "yaml"),
            ),
    );

    registry.register_template(
        "file-upload",
        Template::new("Subida de Archivos")
            .icon("📎")
            .category("features")
            .field("title", FieldDescriptor::text("Título").required())
            .field("supportedFormats", FieldDescriptor::list("Formatos Soportados"))
            .field("processing", FieldDescriptor::textarea("Procesamiento")),
    );

    registry.register_template(
        "image-analysis",
        Template::new("Análisis de Imágenes")
            .icon("🖼️")
            .category("ai")
            .field("title", FieldDescriptor::text("Título").required())
            .field("visionCapabilities", FieldDescriptor::list("Capacidades Vision AI"))
            .field("analysisTypes", FieldDescriptor::list("Tipos de Análisis")),
    );

    registry.register_template(
        "reasoning",
        Template::new("Sistema de Reasoning")
            .icon("🧠")
            .category("ai")
            .field("title", FieldDescriptor::text("Título").required())
            .field("description", FieldDescriptor::textarea("Descripción"))
            .field("phases", FieldDescriptor::list("Fases de Ejecución"))
            .field("features", FieldDescriptor::list("Características")),
    );

    registry.register_template(
        "data-viz",
        Template::new("Visualización de Datos")
            .icon("📊")
            .category("features")
            .field("title", FieldDescriptor::text("Título").required())
            .field("tableFeatures", FieldDescriptor::list("Features de Tablas"))
            .field("chartTypes", FieldDescriptor::list("Tipos de Gráficos")),
    );

    registry.register_template(
        "references",
        Template::new("Gestión de Referencias")
            .icon("🔗")
            .category("features")
            .field("title", FieldDescriptor::text("Título").required())
            .field("description", FieldDescriptor::textarea("Descripción"))
            .field("features", FieldDescriptor::list("Características")),
    );

    registry.register_template(
        "ui-features",
        Template::new("Características de Interfaz")
            .icon("🎨")
            .category("ui")
            .field("title", FieldDescriptor::text("Título").required())
            .field("features", FieldDescriptor::list("Features UI"))
            .field("interactions", FieldDescriptor::list("Interacciones")),
    );

    registry.register_template(
        "configuration",
        Template::new("Configuración")
            .icon("⚙️")
            .category("system")
            .field("title", FieldDescriptor::text("Título").required())
            .field("settings", FieldDescriptor::list("Configuraciones"))
            .field("advanced", FieldDescriptor::textarea("Opciones Avanzadas")),
    );

    registry.register_template(
        "export-history",
        Template::new("Exportación e Historial")
            .icon("📤")
            .category("features")
            .field("title", FieldDescriptor::text("Título").required())
            .field("exportFormats", FieldDescriptor::list("Formatos de Exportación"))
            .field("historyFeatures", FieldDescriptor::list("Features de Historial")),
    );
}

pub(super) fn register_default_blocks(registry: &mut TemplateRegistry) {
    registry.register_block("code-block", Block::new("Bloque de Código", |data| {
        let language = data
            .get("language")
            .filter(|l| l.is_truthy())
            .map(ContentValue::to_string)
            .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string());
        Ok(format!("```{}\n{}\n```", language, text_of(data, "code")))
    }));

    registry.register_block("list-block", Block::new("Lista", |data| {
        let items = data
            .get("items")
            .and_then(ContentValue::as_list)
            .unwrap_or_default();
        Ok(items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n"))
    }));

    registry.register_block("table-block", Block::new("Tabla", |data| {
        let (headers, rows) = match (
            data.get("headers").and_then(ContentValue::as_list),
            data.get("rows").and_then(ContentValue::as_list),
        ) {
            (Some(headers), Some(rows)) => (headers, rows),
            _ => return Ok(String::new()),
        };

        let header_line = format!("| {} |", join_cells(headers));
        let separator = format!(
            "| {} |",
            headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
        );
        let body = rows
            .iter()
            .map(|row| match row.as_list() {
                Some(cells) => format!("| {} |", join_cells(cells)),
                None => format!("| {} |", row),
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!("{}\n{}\n{}", header_line, separator, body))
    }));

    registry.register_block("diagram-block", Block::new("Diagrama", |data| {
        Ok(format!("```\n{}\n```", text_of(data, "diagram")))
    }));
}

/// Display form of a key, or empty when absent.
fn text_of(data: &ContentMap, key: &str) -> String {
    data.get(key).map(ContentValue::to_string).unwrap_or_default()
}

fn join_cells(cells: &[ContentValue]) -> String {
    cells
        .iter()
        .map(ContentValue::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use crate::domain::specification::content_map;
    use crate::domain::templates::TemplateRegistry;
    use serde_json::json;

    #[test]
    fn defaults_register_twelve_templates_and_four_blocks() {
        let registry = TemplateRegistry::with_defaults();

        assert_eq!(registry.template_count(), 12);
        assert_eq!(registry.block_count(), 4);
        assert_eq!(
            registry.get_categories(),
            vec!["core", "ai", "system", "features", "ui"]
        );
    }

    #[test]
    fn code_block_defaults_to_javascript() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block("code-block", &content_map(json!({"code": "run()"})))
            .unwrap();

        assert_eq!(output, "```javascript\nrun()\n```");
    }

    #[test]
    fn code_block_uses_declared_language() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block(
                "code-block",
                &content_map(json!({"code": "fn main() {}", "language": "rust"})),
            )
            .unwrap();

        assert_eq!(output, "```rust\nfn main() {}\n```");
    }

    #[test]
    fn list_block_renders_bullets() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block("list-block", &content_map(json!({"items": ["a", "b"]})))
            .unwrap();

        assert_eq!(output, "- a\n- b");
    }

    #[test]
    fn table_block_renders_markdown_table() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block(
                "table-block",
                &content_map(json!({
                    "headers": ["Name", "Kind"],
                    "rows": [["api", "service"], ["db", "store"]]
                })),
            )
            .unwrap();

        assert_eq!(
            output,
            "| Name | Kind |\n| --- | --- |\n| api | service |\n| db | store |"
        );
    }

    #[test]
    fn table_block_without_rows_is_empty() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block("table-block", &content_map(json!({"headers": ["A"]})))
            .unwrap();

        assert!(output.is_empty());
    }

    #[test]
    fn diagram_block_wraps_in_plain_fence() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render_block("diagram-block", &content_map(json!({"diagram": "A -> B"})))
            .unwrap();

        assert_eq!(output, "```\nA -> B\n```");
    }

    #[test]
    fn features_template_renders_title_and_bullets() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render(
                "features",
                &content_map(json!({"title": "Core Features", "features": ["fast", "simple"]})),
            )
            .unwrap();

        assert_eq!(
            output,
            "## Core Features\n\n### Título\nCore Features\n\n### Features\n- fast\n- simple\n\n"
        );
    }

    #[test]
    fn catalogue_labels_match_export_language() {
        let registry = TemplateRegistry::with_defaults();

        let output = registry
            .render(
                "rag-system",
                &content_map(json!({"title": "Búsqueda", "ragDescription": "Recuperación aumentada"})),
            )
            .unwrap();

        assert_eq!(
            output,
            "## Búsqueda\n\n### Título\nBúsqueda\n\n### ¿Qué es RAG?\nRecuperación aumentada\n\n"
        );
        assert_eq!(
            registry.get_template("configuration").unwrap().name,
            "Configuración"
        );
    }
}
