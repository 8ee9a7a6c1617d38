//! Audit Comprehensive Test Suite
//!
//! End-to-end checks of the auditor through real ledger files: the engine
//! against the built-in rules, the watchdog against its violations log and
//! checkpoint, and the generic properties of verification.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test audit_comprehensive
//!
//! # Run watchdog tests only
//! cargo test --test audit_comprehensive watchdog::
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;
use verdict::prelude::*;

pub mod properties;
pub mod rules;
pub mod scenarios;
pub mod watchdog;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Temporary directory holding a ledger and a violations log
pub struct Ledger {
    /// Keeps the directory alive
    pub dir: TempDir,
    /// NDJSON ledger path
    pub events: PathBuf,
    /// Violations log path
    pub violations: PathBuf,
}

impl Ledger {
    /// Empty ledger (the file is not created until the first append)
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let events = dir.path().join("ledger").join("events.jsonl");
        let violations = dir.path().join("audit").join("violations.jsonl");
        fs::create_dir_all(events.parent().unwrap()).unwrap();
        Self {
            dir,
            events,
            violations,
        }
    }

    /// Watchdog configuration over this ledger
    pub fn config(&self) -> WatchdogConfig {
        WatchdogConfig::new(&self.events, &self.violations)
    }

    /// Checkpoint location inside the temp directory
    pub fn checkpoint(&self) -> PathBuf {
        self.dir.path().join("watchdog.checkpoint")
    }

    /// Append raw lines, as the producing system would
    pub fn append_lines(&self, lines: &[&str]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events)
            .unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    /// Append JSON records, one per line
    pub fn append(&self, records: &[Value]) {
        let lines: Vec<String> = records.iter().map(Value::to_string).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.append_lines(&refs);
    }

    /// Read the violations log as raw JSON objects
    pub fn violation_lines(&self) -> Vec<Value> {
        read_json_lines(&self.violations)
    }
}

/// Parse every line of an NDJSON file
pub fn read_json_lines(path: &Path) -> Vec<Value> {
    match fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// A fully identified ledger record at `second` seconds past 15:00 UTC
pub fn record(event_type: &str, task_id: &str, second: u32) -> Value {
    json!({
        "event_type": event_type,
        "task_id": task_id,
        "agent_id": "agent",
        "timestamp": format!("2025-11-24T15:00:{:02}Z", second),
    })
}

/// Same as [`record`], as an [`Event`]
pub fn event(event_type: &str, task_id: &str, second: u32) -> Event {
    Event::new(
        event_type,
        task_id,
        "agent",
        format!("2025-11-24T15:00:{:02}Z", second),
    )
}

/// Names of the violations in a report, in report order
pub fn violation_names(report: &VerificationReport) -> Vec<String> {
    report
        .violations
        .iter()
        .map(|v| v.invariant_name.clone())
        .collect()
}
