//! Votes must reference a proposal created earlier in the ledger
//!
//! Unlike the causal rules this one is not scoped to a task: a proposal
//! created by any task may be voted on by any later event. The
//! `proposal_id` is read from the event's payload, top level first, then a
//! nested `payload` object.

use crate::error::RuleError;
use crate::rule::{CheckOutcome, Rule, RuleContext};
use crate::rules::PROPOSAL_WORKFLOW_INTEGRITY;
use rustc_hash::FxHashSet;
use serde_json::Value;
use verdict_core::{event_types, Event, Severity};

const PROPOSAL_ID: &str = "proposal_id";

/// Every `PROPOSAL_VOTED_YES` follows a matching `PROPOSAL_CREATED`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProposalWorkflowIntegrity;

/// Comparable form of a proposal id
///
/// Strings and other JSON values live in separate key spaces, so the string
/// `"7"` never matches the number `7`. `null` counts as absent.
#[derive(Debug, PartialEq, Eq, Hash)]
enum ProposalKey<'a> {
    Text(&'a str),
    Json(String),
}

impl std::fmt::Display for ProposalKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalKey::Text(s) => f.write_str(s),
            ProposalKey::Json(s) => f.write_str(s),
        }
    }
}

fn proposal_key(event: &Event) -> Option<ProposalKey<'_>> {
    match event.field(PROPOSAL_ID)? {
        Value::Null => None,
        Value::String(s) => Some(ProposalKey::Text(s)),
        other => Some(ProposalKey::Json(other.to_string())),
    }
}

impl Rule for ProposalWorkflowIntegrity {
    fn name(&self) -> &str {
        PROPOSAL_WORKFLOW_INTEGRITY
    }

    fn description(&self) -> &str {
        "Votes must reference a proposal created earlier in the ledger"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, events: &[Event], _context: &RuleContext) -> Result<CheckOutcome, RuleError> {
        let mut created: FxHashSet<ProposalKey<'_>> = FxHashSet::default();

        for (index, event) in events.iter().enumerate() {
            if event.is_type(event_types::PROPOSAL_CREATED) {
                if let Some(id) = proposal_key(event) {
                    created.insert(id);
                }
            } else if event.is_type(event_types::PROPOSAL_VOTED_YES) {
                match proposal_key(event) {
                    None => {
                        return Ok(CheckOutcome::fail_at(
                            format!("Vote at index {} carries no proposal_id", index),
                            vec![index],
                        ));
                    }
                    Some(id) if !created.contains(&id) => {
                        return Ok(CheckOutcome::fail_at(
                            format!(
                                "Vote at index {} references proposal {} that was never created",
                                index, id
                            ),
                            vec![index],
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(CheckOutcome::pass())
    }
}
