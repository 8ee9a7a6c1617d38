//! Convenient imports for Verdict.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use verdict::prelude::*;
//!
//! let auditor = Auditor::open(WatchdogConfig::new("events.jsonl", "violations.jsonl"))?;
//! ```

// Main entry point
pub use crate::auditor::{Auditor, AuditorBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Data model
pub use verdict_core::{Event, InvariantViolation, Severity};

// Rules and verification
pub use verdict_engine::{CheckOutcome, InvariantEngine, Rule, RuleContext, RuleError, RuleRegistry, VerificationReport};

// Ledger access
pub use verdict_durability::{EventSource, FileEventSource, MemoryEventSource, ViolationEvent};

// Watchdog
pub use verdict_watchdog::{
    KernelDirective, LoggingObserver, TickResult, TickStatus, ViolationObserver, Watchdog,
    WatchdogConfig, WatchdogRunner, WatchdogStatus,
};
