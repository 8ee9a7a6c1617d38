//! Logging setup for hosts and tests.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's decision.

use tracing::Level;

/// Install a `fmt` subscriber printing events at `level` and above.
///
/// Safe to call more than once: only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_tracing(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
