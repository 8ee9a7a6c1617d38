//! Unified error types for Verdict.
//!
//! This module provides one error type that wraps the member crates' errors
//! and presents a consistent interface to users.

use thiserror::Error;
use verdict_durability::DurabilityError;
use verdict_engine::EngineError;
use verdict_watchdog::WatchdogError;

/// All Verdict errors.
///
/// Rule failures are never errors: they are violations in a report. These
/// variants cover setup and I/O around the audit itself.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unparsable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// No rule with this name is registered
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// Checkpoint or record that cannot be decoded
    #[error("corruption: {0}")]
    Corruption(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for Verdict operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is an I/O error.
    ///
    /// I/O errors are usually transient: the next watchdog tick retries.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if persisted state could not be decoded.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }
}

// Convert from durability errors
impl From<DurabilityError> for Error {
    fn from(e: DurabilityError) -> Self {
        match e {
            DurabilityError::Io(io_err) => Error::Io(io_err),
            DurabilityError::Serialization(json_err) => Error::Serialization(json_err.to_string()),
            corrupt @ DurabilityError::CorruptCheckpoint { .. } => {
                Error::Corruption(corrupt.to_string())
            }
        }
    }
}

// Convert from engine errors
impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UnknownRule(name) => Error::UnknownRule(name),
        }
    }
}

// Convert from watchdog errors
impl From<WatchdogError> for Error {
    fn from(e: WatchdogError) -> Self {
        match e {
            WatchdogError::Config(msg) => Error::Config(msg),
            WatchdogError::Toml(toml_err) => Error::Config(toml_err.to_string()),
            WatchdogError::Durability(inner) => inner.into(),
            WatchdogError::Io(io_err) => Error::Io(io_err),
        }
    }
}

// Convert from core data-model errors
impl From<verdict_core::Error> for Error {
    fn from(e: verdict_core::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
