use crate::error::RuleError;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use crate::rules::NO_DUPLICATE_EVENTS;
use rustc_hash::FxHashMap;
use verdict_core::{Event, Severity};

/// No two events share `(task_id, event_type, timestamp)`
///
/// Fields are compared as raw text, so two events that both lack a field
/// agree on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicateEvents;

type Identity<'a> = (Option<&'a str>, Option<&'a str>, Option<&'a str>);

impl Rule for NoDuplicateEvents {
    fn name(&self) -> &str {
        NO_DUPLICATE_EVENTS
    }

    fn description(&self) -> &str {
        "No two events may share task_id, event_type and timestamp"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> Result<CheckOutcome, RuleError> {
        let mut first_seen: FxHashMap<Identity<'_>, usize> =
            FxHashMap::with_capacity_and_hasher(events.len(), Default::default());

        for (index, event) in events.iter().enumerate() {
            let identity = (event.task_id(), event.event_type(), event.timestamp());
            if let Some(&first) = first_seen.get(&identity) {
                return Ok(CheckOutcome::fail_at(
                    format!(
                        "Duplicate event at index {} (first seen at index {})",
                        index, first
                    ),
                    vec![first, index],
                ));
            }
            first_seen.insert(identity, index);
        }

        Ok(CheckOutcome::pass())
    }
}
