//! Notification hooks
//!
//! Observers are how an alerting or kernel-control system learns about
//! violations. Both callbacks default to doing nothing, so an observer only
//! implements what it cares about. They run on the ticking thread after the
//! tick has been committed, outside the watchdog's lock.

use tracing::{error, warn};
use verdict_durability::ViolationEvent;

/// Receives recorded violations and halt recommendations
pub trait ViolationObserver: Send + Sync {
    /// A violation was recorded (when `notify_on_violation` is set)
    fn on_violation(&self, _violation: &ViolationEvent) {}

    /// A CRITICAL violation raised the halt latch (when `halt_on_critical` is set)
    fn on_halt(&self, _violation: &ViolationEvent) {}
}

/// Observer that reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ViolationObserver for LoggingObserver {
    fn on_violation(&self, violation: &ViolationEvent) {
        warn!(
            "Violation recorded: {} [{}] {}",
            violation.violated_invariant.as_deref().unwrap_or("<unknown>"),
            violation.severity,
            violation.message
        );
    }

    fn on_halt(&self, violation: &ViolationEvent) {
        error!(
            "Halt recommended after {}: {}",
            violation.violated_invariant.as_deref().unwrap_or("<unknown>"),
            violation.message
        );
    }
}
