use crate::error::RuleError;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use crate::rules::NO_ORPHANED_EVENTS;
use verdict_core::{Event, Severity};

/// Every event carries non-empty `task_id`, `agent_id`, `event_type` and `timestamp`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrphanedEvents;

impl Rule for NoOrphanedEvents {
    fn name(&self) -> &str {
        NO_ORPHANED_EVENTS
    }

    fn description(&self) -> &str {
        "Every event must carry task_id, agent_id, event_type and timestamp"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> Result<CheckOutcome, RuleError> {
        for (index, event) in events.iter().enumerate() {
            if let Some(field) = event.first_missing_field() {
                return Ok(CheckOutcome::fail_at(
                    format!(
                        "Event at index {} is missing required field '{}'",
                        index, field
                    ),
                    vec![index],
                ));
            }
        }
        Ok(CheckOutcome::pass())
    }
}
