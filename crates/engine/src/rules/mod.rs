//! Built-in ledger rules
//!
//! | Rule | Severity | Invariant |
//! |------|----------|-----------|
//! | BROADCAST_LICENSE_REQUIREMENT | CRITICAL | LICENSE_VALID precedes BROADCAST within the task |
//! | CREDIT_TRANSFER_PROPOSAL_REQUIREMENT | CRITICAL | PROPOSAL_PASSED precedes CREDIT_TRANSFER within the task |
//! | NO_ORPHANED_EVENTS | HIGH | identifying fields present and non-empty |
//! | EVENT_SEQUENCE_INTEGRITY | HIGH | timestamps non-decreasing within each task |
//! | NO_DUPLICATE_EVENTS | CRITICAL | (task_id, event_type, timestamp) unique |
//! | PROPOSAL_WORKFLOW_INTEGRITY | HIGH | votes reference an earlier created proposal |
//!
//! Every rule stops at the first offender and names it in the message.

mod causal;
mod duplicates;
mod orphans;
mod proposals;
mod sequence;

pub use causal::PrecedingEventRule;
pub use duplicates::NoDuplicateEvents;
pub use orphans::NoOrphanedEvents;
pub use proposals::ProposalWorkflowIntegrity;
pub use sequence::EventSequenceIntegrity;

use crate::rule::Rule;
use std::sync::Arc;

/// Name of the broadcast licensing rule
pub const BROADCAST_LICENSE_REQUIREMENT: &str = "BROADCAST_LICENSE_REQUIREMENT";
/// Name of the credit transfer authorisation rule
pub const CREDIT_TRANSFER_PROPOSAL_REQUIREMENT: &str = "CREDIT_TRANSFER_PROPOSAL_REQUIREMENT";
/// Name of the identifying-fields rule
pub const NO_ORPHANED_EVENTS: &str = "NO_ORPHANED_EVENTS";
/// Name of the per-task ordering rule
pub const EVENT_SEQUENCE_INTEGRITY: &str = "EVENT_SEQUENCE_INTEGRITY";
/// Name of the duplicate detection rule
pub const NO_DUPLICATE_EVENTS: &str = "NO_DUPLICATE_EVENTS";
/// Name of the proposal workflow rule
pub const PROPOSAL_WORKFLOW_INTEGRITY: &str = "PROPOSAL_WORKFLOW_INTEGRITY";

/// The built-in rules in their canonical registration order
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(PrecedingEventRule::broadcast_license()),
        Arc::new(PrecedingEventRule::credit_transfer_proposal()),
        Arc::new(NoOrphanedEvents),
        Arc::new(EventSequenceIntegrity),
        Arc::new(NoDuplicateEvents),
        Arc::new(ProposalWorkflowIntegrity),
    ]
}
