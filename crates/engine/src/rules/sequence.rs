//! Per-task chronological ordering
//!
//! Events of one task may be interleaved with other tasks in the ledger, but
//! among themselves their timestamps must never go backwards. Events are
//! grouped per task in first-appearance order of the task, keeping ledger
//! order inside each group, and adjacent pairs are compared by instant.
//!
//! Every timestamp is parsed before any comparison, so a malformed
//! timestamp is reported ahead of ordering problems.

use crate::error::RuleError;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use crate::rules::EVENT_SEQUENCE_INTEGRITY;
use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;
use verdict_core::{parse_timestamp, Event, RequiredField, Severity};

/// Timestamps are non-decreasing within each task
#[derive(Debug, Clone, Copy, Default)]
pub struct EventSequenceIntegrity;

type TaskGroup<'a> = (&'a str, Vec<(usize, DateTime<FixedOffset>)>);

impl Rule for EventSequenceIntegrity {
    fn name(&self) -> &str {
        EVENT_SEQUENCE_INTEGRITY
    }

    fn description(&self) -> &str {
        "Events within a task must be in non-decreasing timestamp order"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> Result<CheckOutcome, RuleError> {
        let mut groups: Vec<TaskGroup<'_>> = Vec::new();
        let mut slots: FxHashMap<&str, usize> = FxHashMap::default();

        for (index, event) in events.iter().enumerate() {
            // Missing identifiers are NO_ORPHANED_EVENTS' concern
            let (Some(task_id), Some(raw)) = (
                event.required(RequiredField::TaskId),
                event.required(RequiredField::Timestamp),
            ) else {
                continue;
            };

            let instant = match parse_timestamp(raw) {
                Ok(instant) => instant,
                Err(e) => {
                    return Ok(CheckOutcome::fail_at(
                        format!("Malformed timestamp at index {}: {}", index, e),
                        vec![index],
                    ));
                }
            };

            let slot = *slots.entry(task_id).or_insert_with(|| {
                groups.push((task_id, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push((index, instant));
        }

        for (task_id, entries) in &groups {
            for pair in entries.windows(2) {
                let (prev_index, prev_at) = pair[0];
                let (index, at) = pair[1];
                if at < prev_at {
                    return Ok(CheckOutcome::fail_at(
                        format!(
                            "Task {} out of order: event at index {} ({}) precedes event at index {} ({})",
                            task_id,
                            index,
                            at.to_rfc3339(),
                            prev_index,
                            prev_at.to_rfc3339()
                        ),
                        vec![prev_index, index],
                    ));
                }
            }
        }

        Ok(CheckOutcome::pass())
    }
}
