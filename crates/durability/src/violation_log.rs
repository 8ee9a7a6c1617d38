//! Append-only violations log
//!
//! Every violation the watchdog records becomes one JSON line:
//!
//! ```json
//! {"event_type":"VIOLATION","timestamp":"2025-11-24T15:00:11+00:00","agent_id":"watchdog",
//!  "violation_type":"INVARIANT_VIOLATION","severity":"CRITICAL","message":"...",
//!  "violated_invariant":"BROADCAST_LICENSE_REQUIREMENT",
//!  "ledger_snapshot":{"total_events":12,"violations_count":1}}
//! ```
//!
//! Absent optional fields are omitted rather than written as `null`.
//! Parent directories are created on first write. The file has exactly one
//! writer; there is no locking.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use verdict_core::{event_types, now_rfc3339, InvariantViolation, Severity};

/// Agent id stamped on every record the watchdog writes
pub const WATCHDOG_AGENT_ID: &str = "watchdog";

/// `violation_type` for violations produced by invariant rules
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";

/// Ledger counts captured when a violation was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Events in the verified history
    pub total_events: usize,
    /// Violations found in the same pass
    pub violations_count: usize,
}

/// One record of the violations log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Always `VIOLATION`
    pub event_type: String,
    /// Write time (RFC 3339)
    pub timestamp: String,
    /// Always `watchdog`
    pub agent_id: String,
    /// Category of violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_type: Option<String>,
    /// Severity of the broken invariant
    pub severity: Severity,
    /// Explanation from the rule
    pub message: String,
    /// Name of the broken invariant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violated_invariant: Option<String>,
    /// Ledger counts at verification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_snapshot: Option<LedgerSnapshot>,
    /// Offending ledger indices, when the rule reported them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violated_event_indices: Vec<usize>,
}

impl ViolationEvent {
    /// Build the log record for a rule violation, stamped with the current time
    pub fn from_violation(violation: &InvariantViolation, snapshot: LedgerSnapshot) -> Self {
        Self {
            event_type: event_types::VIOLATION.to_string(),
            timestamp: now_rfc3339(),
            agent_id: WATCHDOG_AGENT_ID.to_string(),
            violation_type: Some(INVARIANT_VIOLATION.to_string()),
            severity: violation.severity,
            message: violation.message.clone(),
            violated_invariant: Some(violation.invariant_name.clone()),
            ledger_snapshot: Some(snapshot),
            violated_event_indices: violation.violated_event_indices.clone(),
        }
    }

    /// Whether this record can raise the halt latch
    pub fn is_critical(&self) -> bool {
        self.severity.is_critical()
    }
}

/// Violations log file
#[derive(Debug, Clone)]
pub struct ViolationLog {
    path: PathBuf,
}

impl ViolationLog {
    /// Log at `path`; nothing is created until the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record
    pub fn append(&self, record: &ViolationEvent) -> Result<()> {
        self.append_all(std::slice::from_ref(record))
    }

    /// Append records in order with a single open of the file
    pub fn append_all(&self, records: &[ViolationEvent]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // Serialise everything first so a bad record writes nothing
        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record)?);
            buf.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf.as_bytes())?;
        file.flush()?;

        debug!(
            "Appended {} violation records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read back every record, skipping lines that do not decode
    pub fn read_all(&self) -> Result<Vec<ViolationEvent>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ViolationEvent>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping malformed violations log line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }
}
