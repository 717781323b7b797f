//! The default rule set.
//!
//! Every rule is a pure function of the specification. Rules return findings
//! untagged; the engine stamps each with the rule name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::specification::{ContentValue, Specification};

use super::Finding;

pub const NON_EMPTY_TITLE: &str = "non-empty-title";
pub const VALID_VERSION: &str = "valid-version";
pub const MINIMUM_SECTIONS: &str = "minimum-sections";
pub const UNIQUE_SECTION_IDS: &str = "unique-section-ids";
pub const VALID_CODE_BLOCKS: &str = "valid-code-blocks";
pub const NON_EMPTY_CONTENT: &str = "non-empty-content";
pub const SEQUENTIAL_ORDER: &str = "sequential-order";
pub const VALID_METADATA: &str = "valid-metadata";

/// Content field inspected by `valid-code-blocks`.
pub const CODE_BLOCKS_FIELD: &str = "codeBlocks";

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version pattern is valid"));

type RuleFn = fn(&Specification) -> Result<Vec<Finding>, DomainError>;

/// The default rules in registration order.
pub(super) fn default_rules() -> [(&'static str, RuleFn); 8] {
    [
        (NON_EMPTY_TITLE, non_empty_title),
        (VALID_VERSION, valid_version),
        (MINIMUM_SECTIONS, minimum_sections),
        (UNIQUE_SECTION_IDS, unique_section_ids),
        (VALID_CODE_BLOCKS, valid_code_blocks),
        (NON_EMPTY_CONTENT, non_empty_content),
        (SEQUENTIAL_ORDER, sequential_order),
        (VALID_METADATA, valid_metadata),
    ]
}

/// True when `version` has the `MAJOR.MINOR.PATCH` shape.
pub fn is_valid_version(version: &str) -> bool {
    VERSION_PATTERN.is_match(version)
}

pub fn non_empty_title(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    let mut findings = Vec::new();

    if spec.metadata.title.trim().is_empty() {
        findings.push(Finding::error(
            "metadata.title",
            "Specification title cannot be empty",
        ));
    }

    for (index, section) in spec.sections.iter().enumerate() {
        if section.title.trim().is_empty() {
            findings.push(Finding::error(
                format!("sections[{}].title", index),
                format!("Section #{} needs a title", index + 1),
            ));
        }
    }

    Ok(findings)
}

pub fn valid_version(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    let version = &spec.metadata.version;
    if !version.is_empty() && !is_valid_version(version) {
        return Ok(vec![Finding::warning(
            "metadata.version",
            "Version must follow semver format (e.g. 1.0.0)",
        )]);
    }
    Ok(Vec::new())
}

pub fn minimum_sections(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    if spec.sections.is_empty() {
        return Ok(vec![Finding::warning(
            "sections",
            "Specification must have at least one section",
        )]);
    }
    Ok(Vec::new())
}

/// Flags every repeat of an id; the first occurrence is never flagged.
pub fn unique_section_ids(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    let mut seen = std::collections::HashSet::new();
    let mut findings = Vec::new();

    for (index, section) in spec.sections.iter().enumerate() {
        if !seen.insert(&section.id) {
            findings.push(Finding::error(
                format!("sections[{}].id", index),
                format!("Duplicate section ID: {}", section.id),
            ));
        }
    }

    Ok(findings)
}

/// Checks every `{code, language}` entry of a `codeBlocks` content field.
///
/// # Errors
///
/// Fails when `codeBlocks` is present but is not a list.
pub fn valid_code_blocks(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    let mut findings = Vec::new();

    for (index, section) in spec.sections.iter().enumerate() {
        let code_blocks = match section.content.as_ref().and_then(|c| c.get(CODE_BLOCKS_FIELD)) {
            Some(value) if value.is_truthy() => value,
            _ => continue,
        };

        let blocks = code_blocks.as_list().ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidFormat,
                format!("sections[{}].content.{} must be a list", index, CODE_BLOCKS_FIELD),
            )
        })?;

        for (block_index, block) in blocks.iter().enumerate() {
            let path = format!(
                "sections[{}].content.{}[{}]",
                index, CODE_BLOCKS_FIELD, block_index
            );

            let code_is_blank = match block.get("code") {
                Some(ContentValue::Text(code)) => code.trim().is_empty(),
                Some(other) => !other.is_truthy(),
                None => true,
            };
            if code_is_blank {
                findings.push(Finding::warning(path.clone(), "Empty code block"));
            }

            let has_language = block.get("language").map_or(false, ContentValue::is_truthy);
            if !has_language {
                findings.push(Finding::info(
                    format!("{}.language", path),
                    "Code block has no language specified",
                ));
            }
        }
    }

    Ok(findings)
}

pub fn non_empty_content(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    Ok(spec
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.has_empty_content())
        .map(|(index, section)| {
            Finding::warning(
                format!("sections[{}].content", index),
                format!("Section \"{}\" has no content", section.title),
            )
        })
        .collect())
}

pub fn sequential_order(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    Ok(spec
        .sections
        .iter()
        .enumerate()
        .filter(|(index, section)| section.order != *index as i64)
        .map(|(index, _)| {
            Finding::info(
                format!("sections[{}].order", index),
                "Section order is not sequential (can be fixed automatically)",
            )
        })
        .collect())
}

pub fn valid_metadata(spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    let metadata = &spec.metadata;
    let required = [
        ("title", &metadata.title),
        ("version", &metadata.version),
        ("author", &metadata.author),
    ];

    Ok(required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| {
            Finding::warning(
                format!("metadata.{}", field),
                format!("Required metadata field missing: {}", field),
            )
        })
        .collect())
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
