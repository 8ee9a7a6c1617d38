//! Error types for the core data model

use thiserror::Error;

/// Errors raised while building or interpreting core records.
#[derive(Debug, Error)]
pub enum Error {
    /// A JSON line parsed, but is not an object and so cannot be an event
    #[error("event record must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Timestamp string is not a recognisable ISO-8601 instant
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending timestamp text
        value: String,
        /// Why no accepted format matched
        reason: String,
    },

    /// Severity name outside CRITICAL/HIGH/MEDIUM/LOW
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
