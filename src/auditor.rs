//! Main entry point for Verdict.
//!
//! This module provides the `Auditor` struct, which wires one configuration
//! into a shared ledger source, an invariant engine and a watchdog.

use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use verdict_core::Event;
use verdict_durability::{EventSource, FileEventSource, ViolationEvent};
use verdict_engine::{InvariantEngine, RuleRegistry, VerificationReport};
use verdict_watchdog::{
    KernelDirective, TickResult, ViolationObserver, Watchdog, WatchdogConfig, WatchdogRunner,
    WatchdogStatus,
};

/// Ledger auditor.
///
/// Create one with [`Auditor::open`] or [`Auditor::builder`]. One-shot
/// audits go through [`verify_ledger`](Auditor::verify_ledger), continuous
/// auditing through the watchdog ([`run_once`](Auditor::run_once),
/// [`kernel_tick`](Auditor::kernel_tick) or a background runner).
///
/// # Example
///
/// ```ignore
/// use verdict::prelude::*;
///
/// let auditor = Auditor::open(WatchdogConfig::new("ledger/events.jsonl", "ledger/violations.jsonl"))?;
///
/// // Full audit, no watchdog state touched
/// let report = auditor.verify_ledger()?;
/// println!("{}", report.summary());
///
/// // From the scheduler loop
/// let directive = auditor.kernel_tick(active_tasks);
/// if directive.should_halt {
///     stop_dispatching();
/// }
/// ```
pub struct Auditor {
    source: Arc<dyn EventSource>,
    engine: InvariantEngine,
    watchdog: Arc<Watchdog>,
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("source", &self.source.describe())
            .field("rules", &self.engine.registry().names())
            .field("watchdog", &self.watchdog)
            .finish()
    }
}

impl Auditor {
    /// Open an auditor with the built-in rules.
    ///
    /// Fails if the configuration is invalid or a configured checkpoint
    /// cannot be decoded.
    pub fn open(config: WatchdogConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Create a builder for auditor configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let auditor = Auditor::builder(config)
    ///     .rules(my_registry)
    ///     .observer(Arc::new(LoggingObserver))
    ///     .build()?;
    /// ```
    pub fn builder(config: WatchdogConfig) -> AuditorBuilder {
        AuditorBuilder {
            config,
            source: None,
            rules: None,
            observers: Vec::new(),
        }
    }

    /// Verify the whole ledger once.
    ///
    /// Reads every event from the start and runs every rule. Watchdog
    /// progress, the violations log and the halt latch are left alone.
    pub fn verify_ledger(&self) -> Result<VerificationReport> {
        let history = self.source.read_all()?;
        Ok(self.engine.verify(&history.events))
    }

    /// Verify an in-memory event history.
    pub fn verify_events(&self, events: &[Event]) -> VerificationReport {
        self.engine.verify(events)
    }

    /// Run one watchdog check.
    pub fn run_once(&self) -> TickResult {
        self.watchdog.run_once()
    }

    /// Scheduler hook; see [`Watchdog::kernel_tick`].
    pub fn kernel_tick(&self, task_count: usize) -> KernelDirective {
        self.watchdog.kernel_tick(task_count)
    }

    /// Watchdog progress and halt latch.
    pub fn status(&self) -> WatchdogStatus {
        self.watchdog.status()
    }

    /// Everything recorded in the violations log so far.
    pub fn recorded_violations(&self) -> Result<Vec<ViolationEvent>> {
        Ok(self.watchdog.violation_log().read_all()?)
    }

    /// Start ticking the watchdog every `interval` on a background thread.
    pub fn spawn_runner(&self, interval: Duration) -> Result<WatchdogRunner> {
        Ok(WatchdogRunner::spawn(Arc::clone(&self.watchdog), interval)?)
    }

    /// The engine used for verification.
    pub fn engine(&self) -> &InvariantEngine {
        &self.engine
    }

    /// The underlying watchdog.
    pub fn watchdog(&self) -> &Arc<Watchdog> {
        &self.watchdog
    }
}

/// Builder for [`Auditor`].
pub struct AuditorBuilder {
    config: WatchdogConfig,
    source: Option<Arc<dyn EventSource>>,
    rules: Option<RuleRegistry>,
    observers: Vec<Arc<dyn ViolationObserver>>,
}

impl AuditorBuilder {
    /// Read events from `source` instead of the configured ledger file.
    pub fn source(mut self, source: Arc<dyn EventSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Verify with `rules` instead of the built-in set.
    pub fn rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Add a notification observer to the watchdog.
    pub fn observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the auditor.
    pub fn build(self) -> Result<Auditor> {
        let source: Arc<dyn EventSource> = match self.source {
            Some(source) => source,
            None => Arc::new(FileEventSource::new(self.config.ledger_path.clone())),
        };
        let engine = match self.rules {
            Some(rules) => InvariantEngine::with_rules(rules),
            None => InvariantEngine::new(),
        };

        let mut builder = Watchdog::builder(self.config)
            .source(Arc::clone(&source))
            .engine(engine.clone());
        for observer in self.observers {
            builder = builder.observer(observer);
        }
        let watchdog = Arc::new(builder.build()?);

        Ok(Auditor {
            source,
            engine,
            watchdog,
        })
    }
}
