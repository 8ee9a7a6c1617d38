//! Invariant engine
//!
//! Runs every registered rule over the full event history and collects one
//! violation per failing rule. A rule that errors or panics is reported as
//! a failed check with its registered severity; it never aborts the pass.
//!
//! The engine holds only the immutable registry, so `verify` takes `&self`
//! and can be called from several threads at once.

use crate::error::{EngineError, Result, RuleError};
use crate::registry::RuleRegistry;
use crate::report::VerificationReport;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use serde_json::{Map, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use verdict_core::{now_rfc3339, Event, InvariantViolation};

/// Prefix of messages for checks that could not run to completion
pub const CHECK_EXECUTION_ERROR: &str = "Check execution error";

/// Verifies event histories against a fixed set of rules
#[derive(Debug, Clone)]
pub struct InvariantEngine {
    registry: RuleRegistry,
}

impl Default for InvariantEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantEngine {
    /// Engine with the built-in rules
    pub fn new() -> Self {
        Self::with_rules(RuleRegistry::builtin())
    }

    /// Engine with a caller-supplied rule set
    pub fn with_rules(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// The registered rules
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Verify `events` against every rule, in registration order
    pub fn verify(&self, events: &[Event]) -> VerificationReport {
        let timestamp = now_rfc3339();
        debug!(
            "Verifying {} events against {} rules",
            events.len(),
            self.registry.len()
        );

        let violations: Vec<InvariantViolation> = self
            .registry
            .all_rules()
            .iter()
            .filter_map(|rule| evaluate(rule, events, &timestamp))
            .collect();

        let report = VerificationReport::new(violations, events.len(), timestamp);
        if report.passed {
            info!("{}", report.summary());
        } else {
            warn!("{}", report.summary());
        }
        report
    }

    /// Verify `events` against a single named rule
    pub fn verify_rule(&self, name: &str, events: &[Event]) -> Result<Option<InvariantViolation>> {
        let rule = self
            .registry
            .get(name)
            .ok_or_else(|| EngineError::UnknownRule(name.to_string()))?;
        Ok(evaluate(rule, events, &now_rfc3339()))
    }
}

/// Run one rule behind the error and panic barrier
fn run_check(rule: &dyn Rule, events: &[Event]) -> CheckOutcome {
    let context = RuleContext::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| rule.check(events, &context)));

    let detail = match result {
        Ok(Ok(outcome)) => return outcome,
        Ok(Err(RuleError(message))) => message,
        Err(payload) => panic_message(payload.as_ref()),
    };
    CheckOutcome::fail(format!("{}: {}", CHECK_EXECUTION_ERROR, detail))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

fn evaluate(rule: &Arc<dyn Rule>, events: &[Event], timestamp: &str) -> Option<InvariantViolation> {
    let outcome = run_check(rule.as_ref(), events);
    if outcome.passed {
        return None;
    }

    let mut context = Map::new();
    context.insert(
        "description".to_string(),
        Value::String(rule.description().to_string()),
    );
    context.insert("total_events".to_string(), Value::from(events.len()));

    let violation = InvariantViolation {
        invariant_name: rule.name().to_string(),
        severity: rule.severity(),
        timestamp: timestamp.to_string(),
        message: outcome
            .message
            .unwrap_or_else(|| format!("{} violated", rule.name())),
        violated_event_indices: outcome.offending_indices,
        context,
    };

    if violation.is_blocking() {
        error!(
            "Invariant {} violated [{}]: {}",
            violation.invariant_name, violation.severity, violation.message
        );
    } else {
        warn!(
            "Invariant {} violated [{}]: {}",
            violation.invariant_name, violation.severity, violation.message
        );
    }
    Some(violation)
}
