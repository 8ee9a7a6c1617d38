//! Durability errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading the ledger or writing audit files
#[derive(Debug, Error)]
pub enum DurabilityError {
    /// IO error on the ledger, violations log or checkpoint
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing a record
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Checkpoint file exists but cannot be decoded
    #[error("corrupt checkpoint {}: {reason}", path.display())]
    CorruptCheckpoint {
        /// Checkpoint location
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

/// Result type for durability operations
pub type Result<T> = std::result::Result<T, DurabilityError>;
