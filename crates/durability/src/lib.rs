//! Durability layer for Verdict
//!
//! This crate owns every byte the auditor reads or writes:
//! - [`source`]: NDJSON event ledger readers (file and in-memory)
//! - [`violation_log`]: append-only NDJSON log of recorded violations
//! - [`checkpoint`]: optional watchdog checkpoint file for restart safety
//!
//! The ledger is read-only from here. It is written by the producing system;
//! the violations log and checkpoint are written by exactly one watchdog.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checkpoint;
pub mod error;
pub mod source;
pub mod violation_log;

pub use checkpoint::{CheckpointFile, WatchdogCheckpoint};
pub use error::{DurabilityError, Result};
pub use source::{read_events_from, EventBatch, EventSource, FileEventSource, MemoryEventSource};
pub use violation_log::{
    LedgerSnapshot, ViolationEvent, ViolationLog, INVARIANT_VIOLATION, WATCHDOG_AGENT_ID,
};
