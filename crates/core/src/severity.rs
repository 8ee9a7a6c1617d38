//! Violation severity

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Impact of a broken invariant
///
/// Variants are declared in decreasing impact, so the derived `Ord` puts
/// `Critical` first: `Severity::Critical < Severity::Low`.
///
/// | Severity | Fails report | Halts watchdog |
/// |----------|--------------|----------------|
/// | Critical | yes | yes (when configured) |
/// | High | yes | no |
/// | Medium | no | no |
/// | Low | no | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Breach of a causal or integrity guarantee
    Critical,
    /// Structural defect in the ledger
    High,
    /// Recorded, does not fail verification
    Medium,
    /// Recorded, does not fail verification
    Low,
}

impl Severity {
    /// All severities, highest impact first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }

    /// Whether a violation of this severity fails a verification report
    pub fn fails_report(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }

    /// Whether a violation of this severity can trigger the halt latch
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            _ => Err(Error::UnknownSeverity(s.to_string())),
        }
    }
}
