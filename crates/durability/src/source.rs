//! Event ledger readers
//!
//! The ledger is JSON Lines: one event object per line, appended by the
//! producing system. Reading follows three rules:
//!
//! 1. A line that is not valid JSON (or not a JSON object) is skipped with a
//!    warning. It never becomes an [`Event`] and never aborts the read.
//! 2. A JSON object missing identifying fields IS returned. Rules need to see
//!    it to report it.
//! 3. A final line without a trailing newline that does not parse is treated
//!    as a write in progress: it is neither returned nor counted as consumed,
//!    so the next incremental read picks it up once it is complete.
//!
//! `start_index` is a zero-based line offset. Incremental reads only save
//! I/O; callers still verify the full accumulated history.

use crate::error::Result;
use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use verdict_core::Event;

/// Events read from a ledger starting at some line offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    /// Parsed events in ledger order
    pub events: Vec<Event>,
    /// Line offset the read started from
    pub start_index: usize,
    /// Complete lines processed at or after `start_index`
    pub lines_consumed: usize,
    /// Lines dropped because they were not JSON objects
    pub skipped_lines: usize,
}

impl EventBatch {
    /// Empty batch starting at `start_index`
    pub fn empty(start_index: usize) -> Self {
        Self {
            start_index,
            ..Default::default()
        }
    }

    /// Line offset just past the last consumed line
    pub fn end_index(&self) -> usize {
        self.start_index + self.lines_consumed
    }

    /// Number of events read
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events were read
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take the events, dropping the bookkeeping
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// A readable, append-only event ledger
///
/// Implementations never write. They must be shareable across threads so
/// a watchdog can own one behind an `Arc`.
pub trait EventSource: Send + Sync {
    /// Read every event at or after the zero-based line `start_index`
    fn read_events(&self, start_index: usize) -> Result<EventBatch>;

    /// Read the whole ledger
    fn read_all(&self) -> Result<EventBatch> {
        self.read_events(0)
    }

    /// Human-readable location, used in log lines
    fn describe(&self) -> String;
}

/// Parse NDJSON events from any buffered reader
pub fn read_events_from<R: BufRead>(mut reader: R, start_index: usize) -> Result<EventBatch> {
    let mut batch = EventBatch::empty(start_index);
    let mut buf = Vec::new();
    let mut line_index = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let index = line_index;
        line_index += 1;
        if index < start_index {
            continue;
        }

        let complete = buf.last() == Some(&b'\n');
        let parsed = match std::str::from_utf8(&buf) {
            Ok(text) if text.trim().is_empty() => {
                if complete {
                    batch.lines_consumed += 1;
                }
                continue;
            }
            Ok(text) => Event::from_json_str(text.trim()).map_err(|e| e.to_string()),
            Err(e) => Err(format!("invalid UTF-8: {}", e)),
        };

        match parsed {
            Ok(event) => {
                batch.events.push(event);
                batch.lines_consumed += 1;
            }
            Err(reason) if !complete => {
                debug!(
                    "Line {} is incomplete ({}), leaving it for the next read",
                    index + 1,
                    reason
                );
                break;
            }
            Err(reason) => {
                warn!("Skipping malformed ledger line {}: {}", index + 1, reason);
                batch.skipped_lines += 1;
                batch.lines_consumed += 1;
            }
        }
    }

    Ok(batch)
}

/// Ledger stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    /// Reader for the ledger at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for FileEventSource {
    /// A ledger file that does not exist yet reads as empty.
    fn read_events(&self, start_index: usize) -> Result<EventBatch> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Ledger {} does not exist yet", self.path.display());
                return Ok(EventBatch::empty(start_index));
            }
            Err(e) => return Err(e.into()),
        };
        read_events_from(BufReader::new(file), start_index)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Ledger held in memory, for embedding and tests
///
/// Lines can be appended while readers are active; each read sees a
/// consistent prefix.
#[derive(Debug, Default)]
pub struct MemoryEventSource {
    buffer: RwLock<String>,
}

impl MemoryEventSource {
    /// Empty in-memory ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-filled with raw lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let source = Self::new();
        for line in lines {
            source.push_line(line);
        }
        source
    }

    /// Append one raw line (a newline is added)
    pub fn push_line(&self, line: impl AsRef<str>) {
        let mut buffer = self.buffer.write();
        buffer.push_str(line.as_ref());
        buffer.push('\n');
    }

    /// Append an event serialised as one line
    pub fn push_event(&self, event: &Event) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.push_line(line);
        Ok(())
    }
}

impl EventSource for MemoryEventSource {
    fn read_events(&self, start_index: usize) -> Result<EventBatch> {
        let buffer = self.buffer.read();
        read_events_from(buffer.as_bytes(), start_index)
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
