//! Validation module - rule engine and structured findings.
//!
//! # Components
//!
//! - `ValidationEngine` - Named rules run against a specification
//! - `ValidationRule` - A pure check returning findings
//! - `Finding` / `Severity` - One structured result
//! - `ValidationReport` - Validity plus counts
//! - `validate_section` - Standalone check of one section

mod engine;
mod finding;
mod report;
pub mod rules;
mod section;

pub use engine::{ValidationEngine, ValidationRule};
pub use finding::{Finding, Severity};
pub use report::ValidationReport;
pub use section::{validate_section, SECTION_STRUCTURE, SECTION_TEMPLATE};
