//! Runtime watchdog for Verdict
//!
//! This crate turns one-shot verification into continuous auditing:
//! - [`Watchdog`]: incremental ledger reads, full re-verification, halt latch
//! - [`WatchdogConfig`]: paths, interval and toggles, loadable from TOML
//! - [`ViolationObserver`]: notification hooks for alerting and kernel control
//! - [`WatchdogRunner`]: a dedicated thread ticking on a fixed cadence
//!
//! The watchdog only ever recommends halting. What a halt means is up to
//! the scheduler calling [`Watchdog::kernel_tick`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hooks;
pub mod runner;
pub mod state;
pub mod watchdog;

pub use config::{WatchdogConfig, DEFAULT_CHECK_INTERVAL};
pub use error::{Result, WatchdogError};
pub use hooks::{LoggingObserver, ViolationObserver};
pub use runner::WatchdogRunner;
pub use state::{KernelDirective, TickResult, TickStatus, WatchdogMode, WatchdogState, WatchdogStatus};
pub use watchdog::{Watchdog, WatchdogBuilder};
