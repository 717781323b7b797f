//! Export module - Markdown, JSON and HTML output.
//!
//! # Components
//!
//! - `Exporter` - Format dispatch and per-section export precedence
//! - `SectionExporter` - Per-type override hook
//! - `MarkdownRenderer` - Replaceable Markdown to HTML strategy
//! - `BasicMarkdownRenderer` - Built-in approximate converter

mod exporter;
mod format;
mod html;
mod markdown;
mod text;

pub use exporter::{Exporter, SectionExporter};
pub use format::ExportFormat;
pub use html::{wrap_html, BasicMarkdownRenderer, MarkdownRenderer};
pub use markdown::{TOC_HEADING, UNTITLED};
pub use text::{format_date, generate_anchor, html_escape, humanize_key, NOT_SPECIFIED};
