//! # Verdict
//!
//! Invariant auditor and runtime watchdog for append-only event ledgers.
//!
//! Verdict reads an NDJSON ledger written by some other system, checks the
//! full ordered history against a set of named invariants, records every
//! violation to a separate append-only log, and recommends halting when a
//! CRITICAL invariant is broken.
//!
//! ## Quick Start
//!
//! ```ignore
//! use verdict::prelude::*;
//!
//! let config = WatchdogConfig::from_toml_file("verdict.toml")?;
//! let auditor = Auditor::open(config)?;
//!
//! // One-shot audit
//! let report = auditor.verify_ledger()?;
//! assert!(report.passed, "{}", report.summary());
//!
//! // Continuous auditing on a background thread
//! let runner = auditor.spawn_runner(std::time::Duration::from_secs(5))?;
//! ```
//!
//! ## Layers
//!
//! - [`verdict_core`] - events, severities, violations, timestamps
//! - [`verdict_durability`] - ledger readers, violations log, checkpoints
//! - [`verdict_engine`] - rules, registry, [`InvariantEngine`]
//! - [`verdict_watchdog`] - [`Watchdog`], halt latch, hooks, runner
//!
//! ## Built-in invariants
//!
//! | Rule | Severity |
//! |------|----------|
//! | `BROADCAST_LICENSE_REQUIREMENT` | CRITICAL |
//! | `CREDIT_TRANSFER_PROPOSAL_REQUIREMENT` | CRITICAL |
//! | `NO_ORPHANED_EVENTS` | HIGH |
//! | `EVENT_SEQUENCE_INTEGRITY` | HIGH |
//! | `NO_DUPLICATE_EVENTS` | CRITICAL |
//! | `PROPOSAL_WORKFLOW_INTEGRITY` | HIGH |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod auditor;
mod error;
mod telemetry;

pub mod prelude;

// Re-export main entry points
pub use auditor::{Auditor, AuditorBuilder};
pub use error::{Error, Result};
pub use telemetry::init_tracing;

// Re-export member crates
pub use verdict_core;
pub use verdict_durability;
pub use verdict_engine;
pub use verdict_watchdog;

// Re-export the types most callers need
pub use verdict_core::{Event, InvariantViolation, Severity};
pub use verdict_durability::{EventSource, FileEventSource, MemoryEventSource, ViolationEvent};
pub use verdict_engine::{CheckOutcome, InvariantEngine, Rule, RuleContext, RuleRegistry, VerificationReport};
pub use verdict_watchdog::{
    KernelDirective, TickResult, TickStatus, ViolationObserver, Watchdog, WatchdogConfig,
    WatchdogRunner, WatchdogStatus,
};
