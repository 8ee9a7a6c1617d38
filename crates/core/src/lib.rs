//! Core types for the Verdict ledger auditor
//!
//! This crate defines the data model shared by every layer:
//! - [`Event`]: one record of the append-only ledger, tolerant of missing fields
//! - [`Severity`]: impact ordering used to decide pass/fail and halting
//! - [`InvariantViolation`]: the immutable record produced by a failing rule
//! - [`timestamp`]: ISO-8601 normalisation and parsing
//!
//! Nothing in here performs I/O. Reading the ledger lives in
//! `verdict-durability`, rule evaluation in `verdict-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod severity;
pub mod timestamp;
pub mod violation;

pub use error::{Error, Result};
pub use event::{event_types, Event, RequiredField};
pub use severity::Severity;
pub use timestamp::{normalize_timestamp, now_rfc3339, parse_timestamp};
pub use violation::InvariantViolation;

/// Re-export of the JSON value type used for payloads and contexts
pub use serde_json::{Map as JsonMap, Value as JsonValue};
