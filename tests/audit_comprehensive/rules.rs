//! Built-in Rule Tests
//!
//! Each rule through the full engine, so ordering and isolation from the
//! other rules are exercised too.

use crate::*;

fn verify(events: &[Event]) -> VerificationReport {
    InvariantEngine::new().verify(events)
}

// =============================================================================
// CAUSAL RULES
// =============================================================================

#[test]
fn test_credit_transfer_after_passed_proposal() {
    let report = verify(&[
        event("PROPOSAL_PASSED", "t1", 0),
        event("CREDIT_TRANSFER", "t1", 1),
    ]);
    assert!(report.passed, "{}", report.summary());
}

#[test]
fn test_credit_transfer_with_passed_proposal_in_other_task() {
    let report = verify(&[
        event("PROPOSAL_PASSED", "t0", 0),
        event("CREDIT_TRANSFER", "t1", 1),
    ]);
    assert_eq!(violation_names(&report), vec!["CREDIT_TRANSFER_PROPOSAL_REQUIREMENT"]);
    assert!(report.has_critical());
}

#[test]
fn test_interleaving_breaks_same_task_license() {
    let report = verify(&[
        event("LICENSE_VALID", "t1", 0),
        event("LICENSE_CHECK", "t2", 1),
        event("BROADCAST", "t1", 2),
    ]);
    assert_eq!(violation_names(&report), vec!["BROADCAST_LICENSE_REQUIREMENT"]);
    assert_eq!(report.violations[0].violated_event_indices, vec![2]);
}

// =============================================================================
// ORDERING AND DUPLICATES
// =============================================================================

#[test]
fn test_out_of_order_within_task() {
    let report = verify(&[event("LICENSE_CHECK", "t1", 30), event("LICENSE_VALID", "t1", 10)]);
    assert_eq!(violation_names(&report), vec!["EVENT_SEQUENCE_INTEGRITY"]);
    assert_eq!(report.violations[0].severity, Severity::High);
    assert_eq!(report.violations[0].violated_event_indices, vec![0, 1]);
}

#[test]
fn test_naive_and_space_separated_timestamps_compare_as_utc() {
    let a = Event::new("LICENSE_CHECK", "t1", "a", "2025-11-24 15:00:10");
    let b = Event::new("LICENSE_VALID", "t1", "a", "2025-11-24T15:00:05+00:00");
    let report = verify(&[a, b]);
    assert_eq!(violation_names(&report), vec!["EVENT_SEQUENCE_INTEGRITY"]);
}

#[test]
fn test_unparsable_timestamp_fails_sequence_rule() {
    let report = verify(&[Event::new("LICENSE_CHECK", "t1", "a", "yesterday")]);
    assert_eq!(violation_names(&report), vec!["EVENT_SEQUENCE_INTEGRITY"]);
    assert!(report.violations[0].message.contains("yesterday"));
}

#[test]
fn test_duplicate_reported_once_among_other_failures() {
    let report = verify(&[
        event("BROADCAST", "t1", 0),
        event("BROADCAST", "t1", 0),
        event("BROADCAST", "t1", 0),
    ]);
    let names = violation_names(&report);
    assert_eq!(names.iter().filter(|n| *n == "NO_DUPLICATE_EVENTS").count(), 1);
    assert_eq!(names, vec!["BROADCAST_LICENSE_REQUIREMENT", "NO_DUPLICATE_EVENTS"]);
}

// =============================================================================
// PROPOSALS
// =============================================================================

#[test]
fn test_vote_on_created_proposal_from_other_task() {
    let report = verify(&[
        event("PROPOSAL_CREATED", "t1", 0).with_field("proposal_id", "p-9"),
        event("PROPOSAL_VOTED_YES", "t2", 1).with_field("proposal_id", "p-9"),
    ]);
    assert!(report.passed);
}

#[test]
fn test_vote_on_unknown_proposal() {
    let report = verify(&[
        event("PROPOSAL_CREATED", "t1", 0).with_field("proposal_id", "p-1"),
        event("PROPOSAL_VOTED_YES", "t1", 1).with_field("proposal_id", "p-2"),
    ]);
    assert_eq!(violation_names(&report), vec!["PROPOSAL_WORKFLOW_INTEGRITY"]);
    assert_eq!(report.violations[0].violated_event_indices, vec![1]);
}

// =============================================================================
// CUSTOM RULES
// =============================================================================

struct NoLowercaseTypes;

impl Rule for NoLowercaseTypes {
    fn name(&self) -> &str {
        "UPPERCASE_EVENT_TYPES"
    }

    fn description(&self) -> &str {
        "Event types are upper case"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> std::result::Result<CheckOutcome, RuleError> {
        for (index, event) in events.iter().enumerate() {
            let Some(kind) = event.event_type() else {
                return Err(RuleError::new(format!("no event_type at index {}", index)));
            };
            if kind.chars().any(|c| c.is_ascii_lowercase()) {
                return Ok(CheckOutcome::fail_at(format!("lower case type {}", kind), vec![index]));
            }
        }
        Ok(CheckOutcome::pass())
    }
}

#[test]
fn test_low_severity_custom_rule_does_not_fail_report() {
    let mut registry = RuleRegistry::builtin();
    registry.register(NoLowercaseTypes);
    let report = InvariantEngine::with_rules(registry).verify(&[event("license_check", "t1", 0)]);

    assert!(report.passed);
    assert_eq!(violation_names(&report), vec!["UPPERCASE_EVENT_TYPES"]);
    assert_eq!(report.violations_with_severity(Severity::Low).len(), 1);
}

#[test]
fn test_custom_rule_error_becomes_violation() {
    let mut registry = RuleRegistry::new();
    registry.register(NoLowercaseTypes);
    let mut untyped = event("X", "t1", 0);
    untyped.event_type = None;

    let report = InvariantEngine::with_rules(registry).verify(&[untyped]);
    assert_eq!(
        report.violations[0].message,
        "Check execution error: no event_type at index 0"
    );
}
