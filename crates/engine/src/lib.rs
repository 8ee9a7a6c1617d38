//! Invariant verification for Verdict
//!
//! This crate judges an ordered event history:
//! - Rule: the pure predicate interface every invariant implements
//! - RuleRegistry: named rules in registration order
//! - rules: the six built-in ledger invariants
//! - InvariantEngine: runs every rule and builds a VerificationReport
//!
//! The engine never fails a pass because of a rule: errors and panics
//! inside a check become violations with the rule's own severity.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;

pub use engine::{InvariantEngine, CHECK_EXECUTION_ERROR};
pub use error::{EngineError, Result, RuleError};
pub use registry::RuleRegistry;
pub use report::VerificationReport;
pub use rule::{CheckOutcome, Rule, RuleContext};
