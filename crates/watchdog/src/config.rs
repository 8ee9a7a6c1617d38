//! Watchdog configuration
//!
//! A plain struct, loadable from TOML. Every key except the two paths has
//! a default:
//!
//! ```toml
//! ledger_path = "ledger/events.jsonl"
//! violations_path = "ledger/violations.jsonl"
//! check_interval = 10        # kernel ticks between checks
//! halt_on_critical = true
//! notify_on_violation = true
//! checkpoint_path = "ledger/watchdog.checkpoint"   # optional
//! ```

use crate::error::{Result, WatchdogError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Kernel ticks between checks when not configured
pub const DEFAULT_CHECK_INTERVAL: u64 = 10;

fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL
}

fn default_true() -> bool {
    true
}

/// Watchdog settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// NDJSON event ledger to audit
    pub ledger_path: PathBuf,
    /// Append-only NDJSON log the watchdog writes violations to
    pub violations_path: PathBuf,
    /// `kernel_tick` calls between checks (at least 1)
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    /// Raise the halt latch on CRITICAL violations
    #[serde(default = "default_true")]
    pub halt_on_critical: bool,
    /// Invoke violation observers
    #[serde(default = "default_true")]
    pub notify_on_violation: bool,
    /// Where to persist progress across restarts; none keeps it in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_path: Option<PathBuf>,
}

impl WatchdogConfig {
    /// Defaults for everything but the two paths
    pub fn new(ledger_path: impl Into<PathBuf>, violations_path: impl Into<PathBuf>) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            violations_path: violations_path.into(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            halt_on_critical: true,
            notify_on_violation: true,
            checkpoint_path: None,
        }
    }

    /// Set the kernel tick interval
    pub fn check_interval(mut self, ticks: u64) -> Self {
        self.check_interval = ticks;
        self
    }

    /// Enable or disable the halt latch
    pub fn halt_on_critical(mut self, enabled: bool) -> Self {
        self.halt_on_critical = enabled;
        self
    }

    /// Enable or disable violation notifications
    pub fn notify_on_violation(mut self, enabled: bool) -> Self {
        self.notify_on_violation = enabled;
        self
    }

    /// Persist progress to `path`
    pub fn checkpoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    /// Reject settings the watchdog cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.check_interval == 0 {
            return Err(WatchdogError::Config(
                "check_interval must be at least 1".to_string(),
            ));
        }
        if self.ledger_path.as_os_str().is_empty() {
            return Err(WatchdogError::Config("ledger_path is empty".to_string()));
        }
        if self.violations_path.as_os_str().is_empty() {
            return Err(WatchdogError::Config("violations_path is empty".to_string()));
        }
        if self.violations_path == self.ledger_path {
            return Err(WatchdogError::Config(format!(
                "violations_path must differ from ledger_path ({})",
                self.ledger_path.display()
            )));
        }
        if let Some(checkpoint) = &self.checkpoint_path {
            if checkpoint == &self.ledger_path || checkpoint == &self.violations_path {
                return Err(WatchdogError::Config(format!(
                    "checkpoint_path {} collides with an audit file",
                    checkpoint.display()
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
