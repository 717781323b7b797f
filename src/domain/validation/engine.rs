//! Validation engine - named rules run against a specification.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::domain::foundation::{panic_message, DomainError, ErrorCode};
use crate::domain::specification::Specification;

use super::{rules, Finding, Severity, ValidationReport};

/// A pure check over a specification.
///
/// Returning `Err` (or panicking) marks the rule itself as failed; the engine
/// turns that into one synthetic error finding.
pub trait ValidationRule: Send + Sync {
    fn check(&self, spec: &Specification) -> Result<Vec<Finding>, DomainError>;
}

impl<F> ValidationRule for F
where
    F: Fn(&Specification) -> Result<Vec<Finding>, DomainError> + Send + Sync,
{
    fn check(&self, spec: &Specification) -> Result<Vec<Finding>, DomainError> {
        self(spec)
    }
}

/// Holds named rules in registration order.
#[derive(Clone)]
pub struct ValidationEngine {
    rules: IndexMap<String, Arc<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine loaded with the eight default rules.
    pub fn new() -> Self {
        let mut engine = Self::empty();
        for (name, rule) in rules::default_rules() {
            engine.register_rule(name, rule);
        }
        engine
    }

    /// An engine with no rules.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Registers a rule, replacing any rule with the same name in place.
    pub fn register_rule<R>(&mut self, name: impl Into<String>, rule: R)
    where
        R: ValidationRule + 'static,
    {
        let name = name.into();
        debug!(rule = %name, "Registered validation rule");
        self.rules.insert(name, Arc::new(rule));
    }

    /// Removes a rule. Returns false if no rule had that name.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        self.rules.shift_remove(name).is_some()
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every rule, or only the named subset, and aggregates the findings.
    ///
    /// Unknown names in `subset` are ignored. A failing rule never aborts the
    /// pass.
    pub fn validate(&self, spec: &Specification, subset: Option<&[&str]>) -> ValidationReport {
        let selected: Vec<(&String, &Arc<dyn ValidationRule>)> = match subset {
            Some(names) => names
                .iter()
                .filter_map(|name| self.rules.get_key_value(*name))
                .collect(),
            None => self.rules.iter().collect(),
        };

        let mut findings = Vec::new();
        for (name, rule) in selected {
            findings.extend(run_rule(name, rule.as_ref(), spec));
        }

        ValidationReport::from_findings(findings)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

fn run_rule(name: &str, rule: &dyn ValidationRule, spec: &Specification) -> Vec<Finding> {
    match check_guarded(rule, spec) {
        Ok(findings) => findings
            .into_iter()
            .map(|finding| finding.with_rule(name))
            .collect(),
        Err(err) => {
            error!(rule = %name, code = %err.code, error = %err.message, "Validation rule failed");
            vec![Finding {
                severity: Severity::Error,
                field: None,
                message: format!("Internal error in validation rule: {}", err.message),
                rule: name.to_string(),
            }]
        }
    }
}

/// Runs a rule, converting a panic into `RuleFailed`.
fn check_guarded(rule: &dyn ValidationRule, spec: &Specification) -> Result<Vec<Finding>, DomainError> {
    catch_unwind(AssertUnwindSafe(|| rule.check(spec))).unwrap_or_else(|payload| {
        Err(DomainError::new(
            ErrorCode::RuleFailed,
            panic_message(payload.as_ref()),
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SectionId, Timestamp};
    use crate::domain::specification::{content_map, Section, DEFAULT_VERSION};
    use serde_json::json;

    fn valid_spec() -> Specification {
        let at = Timestamp::from_unix_millis(0);
        let mut spec = Specification::empty(at, DEFAULT_VERSION);
        spec.metadata.title = "Platform".to_string();
        spec.metadata.author = "Ana".to_string();
        spec.sections.push(Section {
            id: SectionId::from_raw("section-1-0"),
            section_type: "features".to_string(),
            title: "Features".to_string(),
            order: 0,
            content: Some(content_map(json!({"features": ["fast"]}))),
            created_at: at,
            updated_at: at,
        });
        spec
    }

    // ───────────────────────────────────────────────────────────────
    // Registration
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn new_engine_has_default_rules_in_order() {
        let engine = ValidationEngine::new();

        assert_eq!(
            engine.rule_names(),
            vec![
                "non-empty-title",
                "valid-version",
                "minimum-sections",
                "unique-section-ids",
                "valid-code-blocks",
                "non-empty-content",
                "sequential-order",
                "valid-metadata",
            ]
        );
    }

    #[test]
    fn remove_rule_reports_presence() {
        let mut engine = ValidationEngine::new();

        assert!(engine.remove_rule("valid-version"));
        assert!(!engine.remove_rule("valid-version"));
        assert!(!engine.has_rule("valid-version"));
        assert_eq!(engine.rule_count(), 7);
    }

    // ───────────────────────────────────────────────────────────────
    // Validation
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn well_formed_specification_has_no_findings() {
        let report = ValidationEngine::new().validate(&valid_spec(), None);

        assert!(report.valid);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn findings_are_tagged_with_rule_name() {
        let mut spec = valid_spec();
        spec.metadata.version = "1.2".to_string();

        let report = ValidationEngine::new().validate(&spec, None);

        assert_eq!(report.total(), 1);
        assert_eq!(report.findings[0].rule, "valid-version");
        assert_eq!(report.findings[0].severity, Severity::Warning);
    }

    #[test]
    fn subset_runs_only_named_rules_and_ignores_unknown() {
        let mut spec = valid_spec();
        spec.metadata.title = String::new();
        spec.metadata.version = "bad".to_string();

        let report = ValidationEngine::new().validate(&spec, Some(&["valid-version", "no-such-rule"]));

        assert_eq!(report.total(), 1);
        assert_eq!(report.findings[0].rule, "valid-version");
        assert!(report.valid);
    }

    #[test]
    fn failing_rule_becomes_single_error_finding() {
        let mut engine = ValidationEngine::empty();
        engine.register_rule("broken", |_: &Specification| -> Result<Vec<Finding>, DomainError> {
            Err(DomainError::new(ErrorCode::InvalidFormat, "boom"))
        });
        engine.register_rule("fine", |_: &Specification| -> Result<Vec<Finding>, DomainError> {
            Ok(vec![Finding::info("sections", "noted")])
        });

        let report = engine.validate(&valid_spec(), None);

        assert!(!report.valid);
        assert_eq!(report.total(), 2);
        assert_eq!(report.findings[0].rule, "broken");
        assert_eq!(report.findings[0].field, None);
        assert!(report.findings[0].message.contains("boom"));
        assert_eq!(report.findings[1].rule, "fine");
    }

    #[test]
    fn panicking_rule_is_contained() {
        let mut engine = ValidationEngine::empty();
        engine.register_rule("panics", |_: &Specification| -> Result<Vec<Finding>, DomainError> {
            panic!("rule exploded")
        });
        engine.register_rule("after", |_: &Specification| -> Result<Vec<Finding>, DomainError> {
            Ok(vec![Finding::warning("metadata", "still ran")])
        });

        let report = engine.validate(&valid_spec(), None);

        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        assert!(report.findings[0].message.contains("rule exploded"));
    }

    #[test]
    fn non_list_code_blocks_surface_as_rule_failure() {
        let mut spec = valid_spec();
        spec.sections[0].content = Some(content_map(json!({"codeBlocks": 42})));

        let report = ValidationEngine::new().validate(&spec, Some(&["valid-code-blocks"]));

        assert!(!report.valid);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.findings[0].rule, "valid-code-blocks");
    }

    #[test]
    fn panic_in_rule_surfaces_as_rule_failed() {
        let rule = |_: &Specification| -> Result<Vec<Finding>, DomainError> { panic!("rule exploded") };

        let err = check_guarded(&rule, &valid_spec()).unwrap_err();

        assert_eq!(err.code, ErrorCode::RuleFailed);
        assert_eq!(err.message, "rule exploded");
    }
}
