//! Watchdog errors

use thiserror::Error;
use verdict_durability::DurabilityError;

/// Errors from configuring, constructing or ticking a watchdog
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// Configuration rejected by validation
    #[error("invalid watchdog configuration: {0}")]
    Config(String),

    /// Ledger, violations log or checkpoint failure
    #[error("durability error: {0}")]
    Durability(#[from] DurabilityError),

    /// Configuration file could not be parsed
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error outside the durability layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for watchdog operations
pub type Result<T> = std::result::Result<T, WatchdogError>;
