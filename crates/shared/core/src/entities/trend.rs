use crate::entities::RiskScore;
use crate::values::AsOf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of systemic risk relative to its recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendClassification {
    /// Risk was higher further in the past
    Improving,
    /// Risk was lower further in the past
    Deteriorating,
    /// Full history present but no strict ordering
    Same,
    /// History incomplete - no enhancement applied
    Indeterminate,
}

impl fmt::Display for TrendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendClassification::Improving => "IMPROVING",
            TrendClassification::Deteriorating => "DETERIORATING",
            TrendClassification::Same => "SAME",
            TrendClassification::Indeterminate => "INDETERMINATE",
        };
        f.write_str(s)
    }
}

/// How historical samples are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMode {
    /// Four samples (2m, 1m, 14d, current) must be strictly monotone
    #[default]
    Strict,
    /// Current vs. 2-months-ago only; a tolerance band marks small moves
    /// as sustained risk
    Simple,
}

/// A risk score computed at a prior reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub as_of: AsOf,
    pub score: RiskScore,
}

/// Outcome of historical trend analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub classification: TrendClassification,
    pub mode: TrendMode,
    /// Chronological (oldest first), ending with the current sample.
    /// Missing historical dates are simply absent.
    pub samples: Vec<HistoricalSample>,
    /// Simple mode: current score within the tolerance band of the oldest
    #[serde(default)]
    pub within_tolerance: bool,
}

impl TrendResult {
    pub fn is_improving(&self) -> bool {
        self.classification == TrendClassification::Improving
    }

    /// Classification seen by the hedge rules
    ///
    /// A small improvement inside the tolerance band still counts as
    /// sustained risk there. Sizing keeps the raw classification.
    pub fn hedge_classification(&self) -> TrendClassification {
        match self.classification {
            TrendClassification::Improving if self.within_tolerance => TrendClassification::Same,
            other => other,
        }
    }

    /// The sample anchored at the decision date
    pub fn current(&self) -> Option<&HistoricalSample> {
        self.samples.last()
    }

    /// The oldest sample available
    pub fn oldest(&self) -> Option<&HistoricalSample> {
        self.samples.first()
    }
}
