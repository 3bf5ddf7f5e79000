use serde::{Deserialize, Serialize};
use std::fmt;

/// Discretized band of the systemic risk score
///
/// Ordered from calmest to most fragile, so `Ord` comparisons read naturally
/// (`level >= RiskLevel::Medium`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    /// All levels in ascending order
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Minimal,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    /// Historical trend analysis only runs for the upper three bands
    pub fn requires_trend(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High | RiskLevel::Extreme)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Extreme => "EXTREME",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
