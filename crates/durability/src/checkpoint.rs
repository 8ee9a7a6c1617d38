//! Watchdog checkpoint file
//!
//! Persists the watchdog's progress so a restarted process resumes from the
//! last processed ledger offset with its halt latch intact. Writes go to a
//! sibling temp file which is then renamed over the checkpoint, so a crash
//! mid-write leaves the previous checkpoint readable.

use crate::error::{DurabilityError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persisted watchdog progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogCheckpoint {
    /// Ledger line offset already processed
    pub last_checked_index: usize,
    /// Violations recorded so far
    pub violation_count: u64,
    /// Halt latch
    pub halt_requested: bool,
}

/// Checkpoint location on disk
#[derive(Debug, Clone)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    /// Checkpoint at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Checkpoint location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint; `None` if none has been written yet
    pub fn load(&self) -> Result<Option<WatchdogCheckpoint>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DurabilityError::CorruptCheckpoint {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Replace the checkpoint atomically
    pub fn store(&self, checkpoint: &WatchdogCheckpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec(checkpoint)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            "Checkpoint at offset {} written to {}",
            checkpoint.last_checked_index,
            self.path.display()
        );
        Ok(())
    }
}
