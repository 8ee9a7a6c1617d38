//! "X must be immediately preceded, within its task, by Y"
//!
//! For each trigger event the scan walks backwards from its index and stops
//! at the first event belonging to a different task. Only the contiguous
//! same-task run directly before the trigger counts: a LICENSE_VALID from
//! the same task that is separated by another task's events does not
//! satisfy the requirement.

use crate::error::RuleError;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use crate::rules::{BROADCAST_LICENSE_REQUIREMENT, CREDIT_TRANSFER_PROPOSAL_REQUIREMENT};
use verdict_core::{event_types, Event, Severity};

/// Requires a `required` event before every `trigger` event in the same task
#[derive(Debug, Clone)]
pub struct PrecedingEventRule {
    name: &'static str,
    description: &'static str,
    severity: Severity,
    trigger: &'static str,
    required: &'static str,
}

impl PrecedingEventRule {
    /// BROADCAST requires LICENSE_VALID
    pub fn broadcast_license() -> Self {
        Self {
            name: BROADCAST_LICENSE_REQUIREMENT,
            description: "BROADCAST events must be preceded by LICENSE_VALID in the same task",
            severity: Severity::Critical,
            trigger: event_types::BROADCAST,
            required: event_types::LICENSE_VALID,
        }
    }

    /// CREDIT_TRANSFER requires PROPOSAL_PASSED
    pub fn credit_transfer_proposal() -> Self {
        Self {
            name: CREDIT_TRANSFER_PROPOSAL_REQUIREMENT,
            description: "CREDIT_TRANSFER events must be preceded by PROPOSAL_PASSED in the same task",
            severity: Severity::Critical,
            trigger: event_types::CREDIT_TRANSFER,
            required: event_types::PROPOSAL_PASSED,
        }
    }

    fn has_preceding_requirement(&self, events: &[Event], index: usize) -> bool {
        let task_id = events[index].task_id();
        for earlier in events[..index].iter().rev() {
            if earlier.task_id() != task_id {
                break;
            }
            if earlier.is_type(self.required) {
                return true;
            }
        }
        false
    }
}

impl Rule for PrecedingEventRule {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> Result<CheckOutcome, RuleError> {
        for (index, event) in events.iter().enumerate() {
            if event.is_type(self.trigger) && !self.has_preceding_requirement(events, index) {
                return Ok(CheckOutcome::fail_at(
                    format!(
                        "{} at index {} (task {}) without preceding {}",
                        self.trigger,
                        index,
                        event.task_id().unwrap_or("<none>"),
                        self.required
                    ),
                    vec![index],
                ));
            }
        }
        Ok(CheckOutcome::pass())
    }
}
