//! Verification report

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use verdict_core::{InvariantViolation, Severity};

/// Result of one full verification pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// False iff some violation is CRITICAL or HIGH
    pub passed: bool,
    /// One entry per failing rule, in rule registration order
    pub violations: Vec<InvariantViolation>,
    /// Number of events examined
    pub checked_events: usize,
    /// When verification ran (RFC 3339)
    pub timestamp: String,
}

impl VerificationReport {
    /// Build a report, deriving `passed` from the violations
    pub fn new(violations: Vec<InvariantViolation>, checked_events: usize, timestamp: String) -> Self {
        let passed = !violations.iter().any(InvariantViolation::is_blocking);
        Self {
            passed,
            violations,
            checked_events,
            timestamp,
        }
    }

    /// Number of violations
    pub fn violations_count(&self) -> usize {
        self.violations.len()
    }

    /// Violations with exactly this severity
    pub fn violations_with_severity(&self, severity: Severity) -> Vec<&InvariantViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Whether any violation is CRITICAL
    pub fn has_critical(&self) -> bool {
        self.violations.iter().any(InvariantViolation::is_critical)
    }

    /// Plain mapping form: `{passed, timestamp, violations_count, checked_events, violations}`
    pub fn to_json(&self) -> Value {
        json!({
            "passed": self.passed,
            "timestamp": self.timestamp,
            "violations_count": self.violations.len(),
            "checked_events": self.checked_events,
            "violations": self.violations,
        })
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        let verdict = if self.passed { "PASSED" } else { "FAILED" };
        if self.violations.is_empty() {
            return format!("Verification {}: {} events, no violations", verdict, self.checked_events);
        }

        let failing: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} ({})", v.invariant_name, v.severity))
            .collect();
        format!(
            "Verification {}: {} events, {} violations: {}",
            verdict,
            self.checked_events,
            self.violations.len(),
            failing.join(", ")
        )
    }
}
