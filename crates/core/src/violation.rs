//! Invariant violation record

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A detected breach of one invariant
///
/// Produced once per failing rule per verification pass. `timestamp` is the
/// time of verification, not of the offending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantViolation {
    /// Name of the rule that failed
    pub invariant_name: String,
    /// Severity copied from the rule at evaluation time
    pub severity: Severity,
    /// When verification ran (RFC 3339)
    pub timestamp: String,
    /// Explanation, naming the first offender where the rule knows it
    pub message: String,
    /// Ledger indices of the offending events; empty if the rule cannot say
    #[serde(default)]
    pub violated_event_indices: Vec<usize>,
    /// Free-form context (rule description, event count at verification)
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl InvariantViolation {
    /// Whether this violation fails a verification report
    pub fn is_blocking(&self) -> bool {
        self.severity.fails_report()
    }

    /// Whether this violation can raise the halt latch
    pub fn is_critical(&self) -> bool {
        self.severity.is_critical()
    }
}
