//! The rule interface
//!
//! A rule is a named, pure predicate over the whole ordered event history.
//! Rules are registered once and shared between threads, so they hold no
//! mutable state; anything a check needs is built on the stack per call.

use crate::error::RuleError;
use serde_json::{Map, Value};
use verdict_core::{Event, Severity};

/// Extra inputs handed to every check. The engine passes an empty map.
pub type RuleContext = Map<String, Value>;

/// Result of one rule check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the invariant holds
    pub passed: bool,
    /// Explanation when it does not
    pub message: Option<String>,
    /// Ledger indices of the offending events
    pub offending_indices: Vec<usize>,
}

impl CheckOutcome {
    /// The invariant holds
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
            offending_indices: Vec::new(),
        }
    }

    /// The invariant is broken, without pinpointing events
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            offending_indices: Vec::new(),
        }
    }

    /// The invariant is broken by the events at `indices`
    pub fn fail_at(message: impl Into<String>, indices: impl Into<Vec<usize>>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            offending_indices: indices.into(),
        }
    }
}

/// An invariant over the ordered event history
///
/// `check` must not assume anything about field presence: malformed events
/// reach every rule. Returning `Err` (or panicking) is reported as a failed
/// check by the engine, with the rule's registered severity.
pub trait Rule: Send + Sync {
    /// Unique rule name, e.g. `NO_DUPLICATE_EVENTS`
    fn name(&self) -> &str;

    /// Human-readable statement of the invariant
    fn description(&self) -> &str;

    /// Impact when the invariant is broken
    fn severity(&self) -> Severity;

    /// Evaluate the invariant over `events` in ledger order
    fn check(&self, events: &[Event], context: &RuleContext) -> Result<CheckOutcome, RuleError>;
}

impl std::fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("severity", &self.severity())
            .finish()
    }
}
