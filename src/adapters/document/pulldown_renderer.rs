//! Pulldown-cmark based Markdown renderer adapter.
//!
//! Standards-compliant alternative to the built-in approximate converter.
//! Renders tables, nested lists and strikethrough that the basic strategy
//! does not.

use pulldown_cmark::{html, Options, Parser};

use crate::domain::export::MarkdownRenderer;

/// Markdown renderer using the pure Rust `pulldown-cmark` library.
///
/// # Example
///
/// ```rust,ignore
/// let exporter = Exporter::new(registry).with_renderer(Arc::new(PulldownMarkdownRenderer::new()));
/// let html = exporter.to_html(&spec);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PulldownMarkdownRenderer {
    options: Options,
}

impl PulldownMarkdownRenderer {
    /// Create a renderer with GFM-style extensions enabled.
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for PulldownMarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for PulldownMarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut html_body = String::new();
        html::push_html(&mut html_body, parser);
        html_body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_lists() {
        let html = PulldownMarkdownRenderer::new().render("## Features\n\n- fast\n- simple\n");

        assert!(html.contains("<h2>Features</h2>"));
        assert!(html.contains("<li>fast</li>"));
        assert!(html.contains("<li>simple</li>"));
    }

    #[test]
    fn renders_tables() {
        let html = PulldownMarkdownRenderer::new().render("| A | B |\n| --- | --- |\n| 1 | 2 |\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn renders_separator() {
        let html = PulldownMarkdownRenderer::new().render("intro\n\n---\n\n## Next");

        assert!(html.contains("<hr />"));
    }
}
