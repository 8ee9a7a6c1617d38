//! Concrete Audit Scenarios
//!
//! The headline behaviours, driven through ledger files and the auditor.

use crate::*;

fn audit(ledger: &Ledger) -> VerificationReport {
    Auditor::open(ledger.config())
        .unwrap()
        .verify_ledger()
        .unwrap()
}

// =============================================================================
// LICENSING
// =============================================================================

#[test]
fn test_unlicensed_broadcast_is_single_critical_violation() {
    let ledger = Ledger::new();
    ledger.append_lines(&[
        r#"{"event_type":"BROADCAST","task_id":"t1","agent_id":"herald","timestamp":"2025-11-24T15:00:10Z"}"#,
    ]);

    let report = audit(&ledger);
    assert!(!report.passed);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].invariant_name, "BROADCAST_LICENSE_REQUIREMENT");
    assert_eq!(report.violations[0].severity, Severity::Critical);
    assert_eq!(report.to_json()["violations"][0]["severity"], "CRITICAL");
}

#[test]
fn test_licensed_broadcast_passes_clean() {
    let ledger = Ledger::new();
    ledger.append(&[
        record("LICENSE_CHECK", "t1", 0),
        record("LICENSE_VALID", "t1", 1),
        record("BROADCAST", "t1", 2),
    ]);

    let report = audit(&ledger);
    assert!(report.passed);
    assert!(report.violations.is_empty());
    assert_eq!(report.checked_events, 3);
}

// =============================================================================
// MALFORMED EVENTS
// =============================================================================

#[test]
fn test_missing_task_id_is_orphan() {
    let ledger = Ledger::new();
    ledger.append_lines(&[
        r#"{"event_type":"LICENSE_CHECK","agent_id":"a","timestamp":"2025-11-24T15:00:00Z"}"#,
    ]);

    let report = audit(&ledger);
    assert!(!report.passed);
    let orphan = report
        .violations
        .iter()
        .find(|v| v.invariant_name == "NO_ORPHANED_EVENTS")
        .expect("orphan violation");
    assert_eq!(orphan.severity, Severity::High);
    assert!(orphan.message.contains("task_id"));
    assert_eq!(orphan.violated_event_indices, vec![0]);
}

#[test]
fn test_invalid_json_lines_are_skipped_not_violations() {
    let ledger = Ledger::new();
    ledger.append_lines(&[
        "{not json",
        &record("LICENSE_CHECK", "t1", 0).to_string(),
        "[1,2,3]",
    ]);

    let report = audit(&ledger);
    assert!(report.passed);
    assert_eq!(report.checked_events, 1);
}

// =============================================================================
// EMPTY LEDGER
// =============================================================================

#[test]
fn test_empty_ledger_is_vacuously_clean() {
    let ledger = Ledger::new();
    ledger.append_lines(&[]);

    let report = audit(&ledger);
    assert!(report.passed);
    assert_eq!(report.checked_events, 0);
    assert!(report.violations.is_empty());
}

#[test]
fn test_every_builtin_rule_passes_empty_history() {
    let engine = InvariantEngine::new();
    for name in engine.registry().names() {
        assert!(
            engine.verify_rule(name, &[]).unwrap().is_none(),
            "{} failed on an empty history",
            name
        );
    }
}

// =============================================================================
// REPORT SHAPE
// =============================================================================

#[test]
fn test_report_json_shape() {
    let ledger = Ledger::new();
    ledger.append(&[record("CREDIT_TRANSFER", "t1", 0), record("BROADCAST", "t2", 1)]);

    let value = audit(&ledger).to_json();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    for key in ["passed", "timestamp", "violations_count", "checked_events", "violations"] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(value["violations_count"], 2);
    assert_eq!(
        value["violations"][0]["invariant_name"],
        "BROADCAST_LICENSE_REQUIREMENT"
    );
    assert_eq!(
        value["violations"][1]["invariant_name"],
        "CREDIT_TRANSFER_PROPOSAL_REQUIREMENT"
    );
}
