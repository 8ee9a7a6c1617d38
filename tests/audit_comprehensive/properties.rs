//! Verification Properties
//!
//! Generic properties over generated ledgers.

use crate::*;
use proptest::prelude::*;

const TYPES: [&str; 7] = [
    "LICENSE_CHECK",
    "LICENSE_VALID",
    "BROADCAST",
    "PROPOSAL_CREATED",
    "PROPOSAL_VOTED_YES",
    "PROPOSAL_PASSED",
    "CREDIT_TRANSFER",
];

fn arb_event() -> impl Strategy<Value = Event> {
    (0..TYPES.len(), 0u8..4, 0u32..60).prop_map(|(kind, task, second)| {
        event(TYPES[kind], &format!("t{}", task), second).with_field("proposal_id", "p")
    })
}

fn arb_history() -> impl Strategy<Value = Vec<Event>> {
    proptest::collection::vec(arb_event(), 0..30)
}

proptest! {
    #[test]
    fn prop_unlicensed_broadcast_always_fails(prefix in arb_history(), task in 0u8..4) {
        // prefix events live in tasks t0..t3; the broadcast gets its own task
        let mut events = prefix;
        events.push(event("BROADCAST", &format!("solo{}", task), 59));

        let report = InvariantEngine::new().verify(&events);
        prop_assert!(!report.passed);
        prop_assert!(violation_names(&report).contains(&"BROADCAST_LICENSE_REQUIREMENT".to_string()));
    }

    #[test]
    fn prop_verify_is_deterministic(events in arb_history()) {
        let engine = InvariantEngine::new();
        let a = engine.verify(&events);
        let b = engine.verify(&events);
        prop_assert_eq!(violation_names(&a), violation_names(&b));
        for (x, y) in a.violations.iter().zip(&b.violations) {
            prop_assert_eq!(&x.message, &y.message);
            prop_assert_eq!(&x.violated_event_indices, &y.violated_event_indices);
            prop_assert_eq!(x.severity, y.severity);
        }
    }

    #[test]
    fn prop_backwards_step_in_task_detected(first in 1u32..60, back in 1u32..60, task in 0u8..4) {
        let later = first.saturating_sub(back.min(first));
        prop_assume!(later < first);
        let t = format!("t{}", task);
        let events = vec![event("LICENSE_CHECK", &t, first), event("LICENSE_VALID", &t, later)];

        let report = InvariantEngine::new().verify(&events);
        prop_assert!(violation_names(&report).contains(&"EVENT_SEQUENCE_INTEGRITY".to_string()));
    }

    #[test]
    fn prop_watchdog_total_matches_ledger(events in arb_history()) {
        let ledger = Ledger::new();
        let records: Vec<Value> = events
            .iter()
            .map(|e| serde_json::to_value(e).unwrap())
            .collect();
        ledger.append(&records);

        let watchdog = Watchdog::open(ledger.config()).unwrap();
        let tick = watchdog.run_once();
        if events.is_empty() {
            prop_assert_eq!(tick.status, TickStatus::Idle);
        } else {
            prop_assert_eq!(tick.total_events, Some(events.len()));
            prop_assert_eq!(watchdog.status().last_checked_index, events.len());
            prop_assert_eq!(ledger.violation_lines().len(), tick.violations);
        }
    }
}
