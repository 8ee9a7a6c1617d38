//! Runtime watchdog
//!
//! Each tick reads the ledger from the last processed offset. When new
//! events exist the FULL history is re-verified, because duplicate and
//! ordering invariants span tick boundaries. Every violation in the report
//! is appended to the violations log, and a CRITICAL one raises the halt
//! latch when `halt_on_critical` is set. The latch is one-way.
//!
//! Progress is committed once the violations log has been written, so the
//! latch and `violation_count` always agree with what is on disk. A failed
//! read or log write leaves the offset untouched and the next tick retries
//! from the same place. The checkpoint, if configured, is stored after the
//! commit; a failed store is logged and the next tick stores again. Calls
//! on one instance are serialised by an internal lock.

use crate::config::WatchdogConfig;
use crate::error::Result;
use crate::hooks::ViolationObserver;
use crate::state::{KernelDirective, TickResult, TickStatus, WatchdogState, WatchdogStatus};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use verdict_durability::{
    CheckpointFile, EventSource, FileEventSource, LedgerSnapshot, ViolationEvent, ViolationLog,
};
use verdict_engine::InvariantEngine;

struct Inner {
    state: WatchdogState,
    /// `run_once` calls
    ticks: u64,
    /// `kernel_tick` calls
    kernel_ticks: u64,
}

/// Work produced by a committed tick that must happen outside the lock
#[derive(Default)]
struct Notifications {
    recorded: Vec<ViolationEvent>,
    halts: Vec<ViolationEvent>,
}

/// Periodic re-verification with a halt latch
pub struct Watchdog {
    config: WatchdogConfig,
    source: Arc<dyn EventSource>,
    engine: InvariantEngine,
    log: ViolationLog,
    checkpoint: Option<CheckpointFile>,
    observers: Vec<Arc<dyn ViolationObserver>>,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchdog")
            .field("source", &self.source.describe())
            .field("violations_path", &self.log.path())
            .field("status", &self.status())
            .finish()
    }
}

/// Builder for [`Watchdog`]
pub struct WatchdogBuilder {
    config: WatchdogConfig,
    source: Option<Arc<dyn EventSource>>,
    engine: Option<InvariantEngine>,
    observers: Vec<Arc<dyn ViolationObserver>>,
}

impl WatchdogBuilder {
    /// Read events from `source` instead of `config.ledger_path`
    pub fn source(mut self, source: Arc<dyn EventSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Verify with `engine` instead of the built-in rules
    pub fn engine(mut self, engine: InvariantEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Add a notification observer
    pub fn observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validate the config and restore any checkpoint
    pub fn build(self) -> Result<Watchdog> {
        self.config.validate()?;

        let source = match self.source {
            Some(source) => source,
            None => Arc::new(FileEventSource::new(self.config.ledger_path.clone())),
        };
        let checkpoint = self.config.checkpoint_path.clone().map(CheckpointFile::new);

        let state = match &checkpoint {
            Some(file) => match file.load()? {
                Some(saved) => {
                    info!(
                        "Restored watchdog checkpoint from {}: offset {}, {} violations, halt_requested={}",
                        file.path().display(),
                        saved.last_checked_index,
                        saved.violation_count,
                        saved.halt_requested
                    );
                    WatchdogState::from(saved)
                }
                None => WatchdogState::default(),
            },
            None => WatchdogState::default(),
        };

        Ok(Watchdog {
            log: ViolationLog::new(self.config.violations_path.clone()),
            engine: self.engine.unwrap_or_default(),
            source,
            checkpoint,
            observers: self.observers,
            inner: Mutex::new(Inner {
                state,
                ticks: 0,
                kernel_ticks: 0,
            }),
            config: self.config,
        })
    }
}

impl Watchdog {
    /// Watchdog over `config.ledger_path` with the built-in rules
    pub fn open(config: WatchdogConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start configuring a watchdog
    pub fn builder(config: WatchdogConfig) -> WatchdogBuilder {
        WatchdogBuilder {
            config,
            source: None,
            engine: None,
            observers: Vec::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// The engine used for verification
    pub fn engine(&self) -> &InvariantEngine {
        &self.engine
    }

    /// The violations log
    pub fn violation_log(&self) -> &ViolationLog {
        &self.log
    }

    /// Snapshot of progress and the halt latch
    pub fn status(&self) -> WatchdogStatus {
        let inner = self.inner.lock();
        WatchdogStatus {
            state: inner.state.mode(),
            last_checked_index: inner.state.last_checked_index,
            violation_count: inner.state.violation_count,
            halt_requested: inner.state.halt_requested,
            ticks: inner.ticks,
        }
    }

    /// Whether a halt has been recommended
    pub fn halt_requested(&self) -> bool {
        self.inner.lock().state.halt_requested
    }

    /// Run one check; never fails, errors come back as `TickStatus::Error`
    pub fn run_once(&self) -> TickResult {
        let (result, notifications) = {
            let mut inner = self.inner.lock();
            inner.ticks += 1;
            match self.tick(&mut inner.state) {
                Ok(done) => done,
                Err(e) => {
                    error!(
                        "Watchdog tick failed on {} at offset {}: {}",
                        self.source.describe(),
                        inner.state.last_checked_index,
                        e
                    );
                    (
                        TickResult::error(e.to_string(), inner.state.halt_requested),
                        Notifications::default(),
                    )
                }
            }
        };
        self.notify(notifications);
        result
    }

    /// Scheduler entry point: checks on every `check_interval`-th call
    ///
    /// `task_count` is the caller's number of active tasks; it only feeds
    /// the log and the halt reason. Once the latch is raised every call
    /// recommends halting.
    pub fn kernel_tick(&self, task_count: usize) -> KernelDirective {
        let due = {
            let mut inner = self.inner.lock();
            inner.kernel_ticks += 1;
            inner.kernel_ticks % self.config.check_interval == 0
        };

        let check_result = if due {
            debug!("Kernel tick due for check ({} active tasks)", task_count);
            Some(self.run_once())
        } else {
            None
        };

        let should_halt = match &check_result {
            Some(result) => result.halt_requested,
            None => self.halt_requested(),
        };
        let reason = should_halt.then(|| {
            format!(
                "CRITICAL invariant violation recorded; halt recommended with {} active tasks",
                task_count
            )
        });

        KernelDirective {
            should_halt,
            reason,
            check_result,
        }
    }

    fn tick(&self, state: &mut WatchdogState) -> Result<(TickResult, Notifications)> {
        let batch = self.source.read_events(state.last_checked_index)?;
        if batch.is_empty() {
            if batch.lines_consumed > 0 {
                // skipped lines only; step past them so they are not re-read
                debug!(
                    "Skipping {} unusable line(s) in {} at offset {}",
                    batch.lines_consumed,
                    self.source.describe(),
                    state.last_checked_index
                );
                let mut next = *state;
                next.last_checked_index = batch.end_index();
                self.commit(state, next);
            } else {
                debug!(
                    "No new events in {} after offset {}",
                    self.source.describe(),
                    state.last_checked_index
                );
            }
            return Ok((TickResult::idle(state.halt_requested), Notifications::default()));
        }

        let history = self.source.read_all()?;
        let report = self.engine.verify(&history.events);

        let snapshot = LedgerSnapshot {
            total_events: history.len(),
            violations_count: report.violations.len(),
        };
        let recorded: Vec<ViolationEvent> = report
            .violations
            .iter()
            .map(|v| ViolationEvent::from_violation(v, snapshot))
            .collect();
        self.log.append_all(&recorded)?;

        let mut next = *state;
        next.violation_count += recorded.len() as u64;
        next.last_checked_index = batch.end_index();

        let mut halts = Vec::new();
        if self.config.halt_on_critical {
            halts = recorded.iter().filter(|r| r.is_critical()).cloned().collect();
            if !halts.is_empty() {
                if !next.halt_requested {
                    error!(
                        "Halt latch raised by {} CRITICAL violation(s) in {}",
                        halts.len(),
                        self.source.describe()
                    );
                }
                next.halt_requested = true;
            }
        }

        self.commit(state, next);

        info!(
            "Watchdog checked {} new events ({} total): {} violations, passed={}, halt_requested={}",
            batch.len(),
            history.len(),
            recorded.len(),
            report.passed,
            state.halt_requested
        );

        let result = TickResult {
            status: TickStatus::Completed,
            new_events: batch.len(),
            total_events: Some(history.len()),
            violations: recorded.len(),
            passed: Some(report.passed),
            halt_requested: state.halt_requested,
            error: None,
        };
        let notifications = Notifications {
            recorded: if self.config.notify_on_violation {
                recorded
            } else {
                Vec::new()
            },
            halts,
        };
        Ok((result, notifications))
    }

    fn commit(&self, state: &mut WatchdogState, next: WatchdogState) {
        *state = next;
        if let Some(file) = &self.checkpoint {
            if let Err(e) = file.store(&next.into()) {
                warn!(
                    "Failed to store watchdog checkpoint {}: {}",
                    file.path().display(),
                    e
                );
            }
        }
    }

    fn notify(&self, notifications: Notifications) {
        for record in &notifications.halts {
            for observer in &self.observers {
                observer.on_halt(record);
            }
        }
        for record in &notifications.recorded {
            for observer in &self.observers {
                observer.on_violation(record);
            }
        }
    }
}
