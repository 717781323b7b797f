//! Aggregate result of a validation pass.

use serde::{Deserialize, Serialize};

use super::{Finding, Severity};

/// Overall validity plus every finding and per-severity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff there are no `error` findings.
    pub valid: bool,
    pub findings: Vec<Finding>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl ValidationReport {
    /// Builds a report, deriving validity and counts from the findings.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
        let error_count = count(Severity::Error);
        let warning_count = count(Severity::Warning);
        let info_count = count(Severity::Info);

        Self {
            valid: error_count == 0,
            findings,
            error_count,
            warning_count,
            info_count,
        }
    }

    pub fn total(&self) -> usize {
        self.findings.len()
    }

    /// Findings of one severity, in report order.
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    /// Findings produced by one rule.
    pub fn by_rule(&self, rule: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule == rule).collect()
    }

    /// One line per finding, or `"No errors"` when there are none.
    pub fn format(&self) -> String {
        if self.findings.is_empty() {
            return "No errors".to_string();
        }
        self.findings
            .iter()
            .map(Finding::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::from_findings(Vec::new())
    }
}
