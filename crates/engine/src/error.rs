//! Engine errors

use thiserror::Error;

/// Errors surfaced to callers of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// No rule with this name is registered
    #[error("unknown rule: {0}")]
    UnknownRule(String),
}

/// Failure inside a rule body
///
/// Rules return this instead of panicking when the ledger has a shape they
/// cannot evaluate. The engine turns it into a failed check; it never
/// reaches the caller of `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    /// Error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<verdict_core::Error> for RuleError {
    fn from(e: verdict_core::Error) -> Self {
        Self(e.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
