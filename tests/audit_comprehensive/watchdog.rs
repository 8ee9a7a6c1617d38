//! Watchdog Tests
//!
//! Ticks against a ledger file that grows between calls, with the
//! violations log and checkpoint on disk.

use crate::*;
use std::sync::{Arc, Mutex};

fn open(ledger: &Ledger) -> Watchdog {
    Watchdog::open(ledger.config()).unwrap()
}

// =============================================================================
// TICKS
// =============================================================================

#[test]
fn test_missing_ledger_is_idle() {
    let ledger = Ledger::new();
    let watchdog = open(&ledger);
    let tick = watchdog.run_once();
    assert_eq!(tick.status, TickStatus::Idle);
    assert_eq!(tick.to_json()["status"], "idle");
}

#[test]
fn test_incremental_reads_full_reverification() {
    let ledger = Ledger::new();
    let watchdog = open(&ledger);

    ledger.append(&[record("LICENSE_CHECK", "t1", 5)]);
    let first = watchdog.run_once();
    assert_eq!(first.status, TickStatus::Completed);
    assert_eq!(first.new_events, 1);
    assert_eq!(first.passed, Some(true));

    // only detectable against the earlier tick's event
    ledger.append(&[record("LICENSE_CHECK", "t1", 5)]);
    let second = watchdog.run_once();
    assert_eq!(second.new_events, 1);
    assert_eq!(second.total_events, Some(2));
    assert_eq!(second.passed, Some(false));

    let logged = ledger.violation_lines();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0]["violated_invariant"], "NO_DUPLICATE_EVENTS");
}

#[test]
fn test_violation_log_record_shape() {
    let ledger = Ledger::new();
    let watchdog = open(&ledger);
    ledger.append(&[record("BROADCAST", "t1", 0)]);
    watchdog.run_once();

    let logged = ledger.violation_lines();
    assert_eq!(logged.len(), 1);
    let line = &logged[0];
    assert_eq!(line["event_type"], "VIOLATION");
    assert_eq!(line["agent_id"], "watchdog");
    assert_eq!(line["violation_type"], "INVARIANT_VIOLATION");
    assert_eq!(line["severity"], "CRITICAL");
    assert_eq!(line["violated_invariant"], "BROADCAST_LICENSE_REQUIREMENT");
    assert_eq!(line["ledger_snapshot"]["total_events"], 1);
    assert_eq!(line["ledger_snapshot"]["violations_count"], 1);
    assert!(line["timestamp"].as_str().unwrap().starts_with("20"));
}

// =============================================================================
// HALT LATCH
// =============================================================================

#[test]
fn test_latch_survives_idle_and_clean_ticks() {
    let ledger = Ledger::new();
    let watchdog = open(&ledger);

    ledger.append(&[record("CREDIT_TRANSFER", "t1", 0)]);
    assert!(watchdog.run_once().halt_requested);

    let idle = watchdog.run_once();
    assert_eq!(idle.status, TickStatus::Idle);
    assert!(idle.halt_requested);

    ledger.append(&[record("LICENSE_CHECK", "t9", 1)]);
    assert!(watchdog.run_once().halt_requested);
    assert_eq!(watchdog.status().state, verdict::verdict_watchdog::WatchdogMode::Halted);
}

#[test]
fn test_high_violation_does_not_latch() {
    let ledger = Ledger::new();
    let watchdog = open(&ledger);
    ledger.append(&[record("LICENSE_CHECK", "t1", 9), record("LICENSE_VALID", "t1", 1)]);

    let tick = watchdog.run_once();
    assert_eq!(tick.passed, Some(false));
    assert_eq!(tick.violations, 1);
    assert!(!tick.halt_requested);
}

#[test]
fn test_kernel_tick_cadence_and_directive() {
    let ledger = Ledger::new();
    let watchdog = Watchdog::open(ledger.config().check_interval(2)).unwrap();
    ledger.append(&[record("BROADCAST", "t1", 0)]);

    let first = watchdog.kernel_tick(3);
    assert!(first.check_result.is_none());
    assert!(!first.should_halt);

    let second = watchdog.kernel_tick(3);
    assert!(second.should_halt);
    assert!(second.reason.is_some());
    assert_eq!(second.check_result.as_ref().unwrap().violations, 1);

    let value = second.to_json();
    assert_eq!(value["should_halt"], true);
    assert_eq!(value["check_result"]["status"], "completed");

    // between checks the latch still answers
    assert!(watchdog.kernel_tick(3).should_halt);
}

// =============================================================================
// HOOKS
// =============================================================================

#[derive(Default)]
struct Collector {
    seen: Mutex<Vec<(String, Severity)>>,
    halted: Mutex<usize>,
}

impl ViolationObserver for Collector {
    fn on_violation(&self, violation: &ViolationEvent) {
        self.seen.lock().unwrap().push((
            violation.violated_invariant.clone().unwrap_or_default(),
            violation.severity,
        ));
    }

    fn on_halt(&self, _violation: &ViolationEvent) {
        *self.halted.lock().unwrap() += 1;
    }
}

#[test]
fn test_hooks_see_every_violation_and_each_critical() {
    let ledger = Ledger::new();
    let collector = Arc::new(Collector::default());
    let auditor = Auditor::builder(ledger.config())
        .observer(collector.clone())
        .build()
        .unwrap();

    ledger.append(&[
        record("BROADCAST", "t1", 0),
        record("CREDIT_TRANSFER", "t2", 1),
        record("LICENSE_CHECK", "t3", 9),
        record("LICENSE_VALID", "t3", 2),
    ]);
    auditor.run_once();

    let seen = collector.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("BROADCAST_LICENSE_REQUIREMENT".to_string(), Severity::Critical),
            ("CREDIT_TRANSFER_PROPOSAL_REQUIREMENT".to_string(), Severity::Critical),
            ("EVENT_SEQUENCE_INTEGRITY".to_string(), Severity::High),
        ]
    );
    assert_eq!(*collector.halted.lock().unwrap(), 2);
    assert_eq!(auditor.recorded_violations().unwrap().len(), 3);
}

// =============================================================================
// CHECKPOINT
// =============================================================================

#[test]
fn test_restart_without_checkpoint_rechecks_from_zero() {
    let ledger = Ledger::new();
    ledger.append(&[record("BROADCAST", "t1", 0)]);
    open(&ledger).run_once();

    let restarted = open(&ledger);
    assert!(!restarted.status().halt_requested);
    let tick = restarted.run_once();
    assert_eq!(tick.new_events, 1);
    assert!(tick.halt_requested);
    assert_eq!(ledger.violation_lines().len(), 2);
}

#[test]
fn test_restart_with_checkpoint_resumes() {
    let ledger = Ledger::new();
    let config = ledger.config().checkpoint_path(ledger.checkpoint());
    ledger.append(&[record("BROADCAST", "t1", 0)]);
    Watchdog::open(config.clone()).unwrap().run_once();

    let saved: Value = serde_json::from_str(&fs::read_to_string(ledger.checkpoint()).unwrap()).unwrap();
    assert_eq!(saved["last_checked_index"], 1);
    assert_eq!(saved["halt_requested"], true);

    let restarted = Watchdog::open(config).unwrap();
    assert!(restarted.status().halt_requested);
    assert_eq!(restarted.run_once().status, TickStatus::Idle);
    assert_eq!(ledger.violation_lines().len(), 1);
}

#[test]
fn test_config_from_toml_file() {
    let ledger = Ledger::new();
    let path = ledger.dir.path().join("verdict.toml");
    fs::write(
        &path,
        format!(
            "ledger_path = {:?}\nviolations_path = {:?}\ncheck_interval = 1\nhalt_on_critical = false\n",
            ledger.events.display().to_string(),
            ledger.violations.display().to_string()
        ),
    )
    .unwrap();

    let config = WatchdogConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.check_interval, 1);
    let watchdog = Watchdog::open(config).unwrap();
    ledger.append(&[record("BROADCAST", "t1", 0)]);
    let directive = watchdog.kernel_tick(1);
    assert!(!directive.should_halt);
    assert_eq!(directive.check_result.unwrap().violations, 1);
}
