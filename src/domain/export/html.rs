//! Markdown to HTML conversion strategies and the HTML page shell.

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{generate_anchor, html_escape};

/// Converts the exporter's Markdown into an HTML body fragment.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\. (.*)$").expect("ordered item pattern is valid"));
static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("link pattern is valid"));
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern is valid"));

/// Line-oriented approximate converter.
///
/// Handles headings 1 to 3 (with anchor ids), bold, italics, inline code,
/// links, paragraphs, flat bullet and numbered lists, rules and fenced code.
/// Nested lists and tables are not rendered faithfully.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMarkdownRenderer;

#[derive(PartialEq)]
enum Block {
    None,
    Paragraph,
    Bullets,
    Numbered,
}

struct Writer {
    html: String,
    open: Block,
}

impl Writer {
    fn close(&mut self) {
        match self.open {
            Block::Paragraph => self.html.push_str("</p>\n"),
            Block::Bullets => self.html.push_str("</ul>\n"),
            Block::Numbered => self.html.push_str("</ol>\n"),
            Block::None => {}
        }
        self.open = Block::None;
    }

    fn item(&mut self, kind: Block, text: &str) {
        if self.open != kind {
            self.close();
            self.html
                .push_str(if kind == Block::Bullets { "<ul>\n" } else { "<ol>\n" });
            self.open = kind;
        }
        self.html.push_str(&format!("<li>{}</li>\n", inline(text)));
    }

    fn paragraph_line(&mut self, text: &str) {
        if self.open == Block::Paragraph {
            self.html.push_str("<br>\n");
        } else {
            self.close();
            self.html.push_str("<p>");
            self.open = Block::Paragraph;
        }
        self.html.push_str(&inline(text));
    }
}

impl MarkdownRenderer for BasicMarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut out = Writer {
            html: String::new(),
            open: Block::None,
        };
        let mut fence: Option<String> = None;

        for line in markdown.lines() {
            if let Some(code) = fence.as_mut() {
                if line.trim_start().starts_with("```") {
                    out.html.push_str(&html_escape(code));
                    out.html.push_str("</code></pre>\n");
                    fence = None;
                } else {
                    code.push_str(line);
                    code.push('\n');
                }
                continue;
            }

            let trimmed = line.trim_end();
            if let Some(language) = trimmed.trim_start().strip_prefix("```") {
                out.close();
                let language = language.trim();
                if language.is_empty() {
                    out.html.push_str("<pre><code>");
                } else {
                    out.html.push_str(&format!(
                        "<pre><code class=\"language-{}\">",
                        html_escape(language)
                    ));
                }
                fence = Some(String::new());
            } else if trimmed.is_empty() {
                out.close();
            } else if let Some((level, text)) = heading(trimmed) {
                out.close();
                out.html.push_str(&format!(
                    "<h{level} id=\"{id}\">{text}</h{level}>\n",
                    level = level,
                    id = generate_anchor(text),
                    text = inline(text)
                ));
            } else if trimmed == "---" {
                out.close();
                out.html.push_str("<hr>\n");
            } else if let Some(item) = trimmed.strip_prefix("- ") {
                out.item(Block::Bullets, item);
            } else if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
                out.item(Block::Numbered, &caps[1]);
            } else {
                out.paragraph_line(trimmed);
            }
        }

        if let Some(code) = fence {
            out.html.push_str(&html_escape(&code));
            out.html.push_str("</code></pre>\n");
        }
        out.close();
        out.html
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    for (level, prefix) in [(3, "### "), (2, "## "), (1, "# ")] {
        if let Some(text) = line.strip_prefix(prefix) {
            return Some((level, text.trim()));
        }
    }
    None
}

/// Inline formatting over escaped text.
///
/// Code spans are emitted verbatim; links and emphasis apply only between them.
fn inline(text: &str) -> String {
    let escaped = html_escape(text);
    let mut html = String::with_capacity(escaped.len());
    let mut rest = 0;

    for span in INLINE_CODE.captures_iter(&escaped) {
        let (Some(whole), Some(code)) = (span.get(0), span.get(1)) else {
            continue;
        };
        html.push_str(&emphasis(&escaped[rest..whole.start()]));
        html.push_str("<code>");
        html.push_str(code.as_str());
        html.push_str("</code>");
        rest = whole.end();
    }

    html.push_str(&emphasis(&escaped[rest..]));
    html
}

fn emphasis(text: &str) -> String {
    let with_links = LINK.replace_all(text, "<a href=\"$2\">$1</a>");
    let with_bold = BOLD.replace_all(&with_links, "<strong>$1</strong>");
    ITALIC.replace_all(&with_bold, "<em>$1</em>").into_owned()
}

const PAGE_CSS: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        h1 { border-bottom: 3px solid #667eea; padding-bottom: 10px; }
        h2 { margin-top: 30px; border-bottom: 2px solid #e0e0e0; padding-bottom: 8px; }
        h3 { margin-top: 20px; color: #667eea; }
        code { background: #f4f4f4; padding: 2px 6px; border-radius: 3px; }
        pre { background: #f4f4f4; padding: 15px; border-radius: 5px; overflow-x: auto; }
        ul, ol { padding-left: 30px; }
        a { color: #667eea; text-decoration: none; }
        a:hover { text-decoration: underline; }"#;

/// Wrap an HTML body in a complete styled document.
pub fn wrap_html(body: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        css = PAGE_CSS,
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        BasicMarkdownRenderer.render(markdown)
    }

    #[test]
    fn headings_get_levels_and_anchor_ids() {
        let html = render("# Title\n\n## Core Features\n\n### Notes");

        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(html.contains("<h2 id=\"core-features\">Core Features</h2>"));
        assert!(html.contains("<h3 id=\"notes\">Notes</h3>"));
    }

    #[test]
    fn inline_formatting() {
        let html = render("**bold** and *soft* with `code` and [link](#core)");

        assert_eq!(
            html,
            "<p><strong>bold</strong> and <em>soft</em> with <code>code</code> and <a href=\"#core\">link</a></p>\n"
        );
    }

    #[test]
    fn code_spans_keep_asterisks_literal() {
        let html = render("use `a*b*c` or *x*");

        assert_eq!(html, "<p>use <code>a*b*c</code> or <em>x</em></p>\n");
    }

    #[test]
    fn consecutive_bullets_share_one_list() {
        let html = render("- fast\n- simple\n\nafter");

        assert_eq!(html, "<ul>\n<li>fast</li>\n<li>simple</li>\n</ul>\n<p>after</p>\n");
    }

    #[test]
    fn numbered_items_form_ordered_list() {
        let html = render("1. **[Intro](#intro)**\n2. **[Usage](#usage)**");

        assert!(html.starts_with("<ol>\n<li><strong><a href=\"#intro\">Intro</a></strong></li>"));
        assert!(html.ends_with("</ol>\n"));
    }

    #[test]
    fn paragraph_lines_are_joined_with_breaks() {
        let html = render("**Versión**: 1.0.0\n**Autor**: Ana");

        assert_eq!(
            html,
            "<p><strong>Versión</strong>: 1.0.0<br>\n<strong>Autor</strong>: Ana</p>\n"
        );
    }

    #[test]
    fn fenced_code_is_escaped_verbatim() {
        let html = render("```rust\nlet x = a < b && **c**;\n```");

        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = a &lt; b &amp;&amp; **c**;\n</code></pre>\n"
        );
    }

    #[test]
    fn horizontal_rule_and_raw_markup_is_escaped() {
        let html = render("---\n<script>");

        assert_eq!(html, "<hr>\n<p>&lt;script&gt;</p>\n");
    }

    #[test]
    fn page_shell_escapes_title() {
        let page = wrap_html("<p>x</p>", "A <b> & C");

        assert!(page.contains("<html lang=\"es\">"));
        assert!(page.contains("<title>A &lt;b&gt; &amp; C</title>"));
        assert!(page.contains("<body>\n<p>x</p>\n</body>"));
    }
}
