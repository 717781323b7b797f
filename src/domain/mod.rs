//! Domain layer containing the specification model and its pure services.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, clock, errors)
//! - `specification` - The document model: metadata, sections, content values
//! - `templates` - Template registry and reusable rendering blocks
//! - `validation` - Rule engine, findings and reports
//! - `export` - Markdown, JSON and HTML exporters

pub mod export;
pub mod foundation;
pub mod specification;
pub mod templates;
pub mod validation;
