//! Watchdog state and tick results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use verdict_durability::WatchdogCheckpoint;

/// Mutable progress owned by one watchdog
///
/// `last_checked_index` counts ledger lines, malformed ones included, so it
/// always lines up with the reader's offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchdogState {
    /// Ledger line offset already processed; never decreases
    pub last_checked_index: usize,
    /// Violations recorded so far
    pub violation_count: u64,
    /// Halt latch; once set it stays set
    pub halt_requested: bool,
}

impl WatchdogState {
    /// Coarse state derived from the latch
    pub fn mode(&self) -> WatchdogMode {
        if self.halt_requested {
            WatchdogMode::Halted
        } else {
            WatchdogMode::Idle
        }
    }
}

impl From<WatchdogCheckpoint> for WatchdogState {
    fn from(cp: WatchdogCheckpoint) -> Self {
        Self {
            last_checked_index: cp.last_checked_index,
            violation_count: cp.violation_count,
            halt_requested: cp.halt_requested,
        }
    }
}

impl From<WatchdogState> for WatchdogCheckpoint {
    fn from(state: WatchdogState) -> Self {
        Self {
            last_checked_index: state.last_checked_index,
            violation_count: state.violation_count,
            halt_requested: state.halt_requested,
        }
    }
}

/// Whether the halt latch has been raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchdogMode {
    /// No CRITICAL violation has raised the latch
    Idle,
    /// Halt recommended until an operator intervenes
    Halted,
}

/// Point-in-time view of a watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogStatus {
    /// Idle or halted
    pub state: WatchdogMode,
    /// Ledger line offset already processed
    pub last_checked_index: usize,
    /// Violations recorded so far
    pub violation_count: u64,
    /// Halt latch
    pub halt_requested: bool,
    /// `run_once` calls so far, in this process
    pub ticks: u64,
}

/// Outcome class of one `run_once`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickStatus {
    /// Nothing new in the ledger
    Idle,
    /// Full history re-verified
    Completed,
    /// The tick failed; progress was not advanced
    Error,
}

/// Result of one `run_once`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    /// Outcome class
    pub status: TickStatus,
    /// Events read since the previous offset
    pub new_events: usize,
    /// Size of the verified history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_events: Option<usize>,
    /// Violations recorded by this tick
    pub violations: usize,
    /// Whether the verification report passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    /// Halt latch after this tick
    pub halt_requested: bool,
    /// Failure text for `Error` ticks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TickResult {
    /// No new events
    pub fn idle(halt_requested: bool) -> Self {
        Self {
            status: TickStatus::Idle,
            new_events: 0,
            total_events: None,
            violations: 0,
            passed: None,
            halt_requested,
            error: None,
        }
    }

    /// Failed tick
    pub fn error(message: impl Into<String>, halt_requested: bool) -> Self {
        Self {
            status: TickStatus::Error,
            new_events: 0,
            total_events: None,
            violations: 0,
            passed: None,
            halt_requested,
            error: Some(message.into()),
        }
    }

    /// Whether verification ran
    pub fn is_completed(&self) -> bool {
        self.status == TickStatus::Completed
    }

    /// Mapping form: `{status, new_events, total_events?, violations, passed?, halt_requested}`
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Answer to a scheduler's `kernel_tick`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelDirective {
    /// Stop dispatching new work
    pub should_halt: bool,
    /// Why, when halting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The check run on this tick, if one was due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_result: Option<TickResult>,
}

impl KernelDirective {
    /// Mapping form: `{should_halt, reason?, check_result?}`
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
