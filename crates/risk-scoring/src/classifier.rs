//! Risk Level Classifier
//!
//! Maps a composite score onto five half-open bands:
//!
//! ```text
//!   0 ──── 0.20 ──── 0.37 ──── 0.42 ──── 0.50 ──── 1
//!   MINIMAL  │  LOW    │ MEDIUM  │  HIGH   │ EXTREME
//! ```
//!
//! Each upper bound is inclusive, so a score sitting exactly on a boundary
//! belongs to the lower band.

use crate::error::{Result, ScoringError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sentinel_core::{RiskLevel, Score};

/// Inclusive upper bounds of the four lower bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelBoundaries {
    pub minimal_max: Score,
    pub low_max: Score,
    pub medium_max: Score,
    pub high_max: Score,
}

impl Default for LevelBoundaries {
    fn default() -> Self {
        Self {
            minimal_max: dec!(0.20),
            low_max: dec!(0.37),
            medium_max: dec!(0.42),
            high_max: dec!(0.50),
        }
    }
}

impl LevelBoundaries {
    /// Wider bands from the strategy's standalone configuration
    pub fn alternate() -> Self {
        Self {
            minimal_max: dec!(0.27),
            low_max: dec!(0.41),
            medium_max: dec!(0.55),
            high_max: dec!(0.68),
        }
    }

    fn bounds(&self) -> [Score; 4] {
        [self.minimal_max, self.low_max, self.medium_max, self.high_max]
    }

    /// Bounds must be strictly increasing and lie strictly inside (0, 1)
    pub fn validate(&self) -> Result<()> {
        let bounds = self.bounds();
        if let Some(b) = bounds
            .iter()
            .find(|b| **b <= Decimal::ZERO || **b >= Decimal::ONE)
        {
            return Err(ScoringError::calibration(
                "level_boundaries",
                format!("bound {} outside (0, 1)", b),
            ));
        }
        if let Some(pair) = bounds.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ScoringError::calibration(
                "level_boundaries",
                format!("bound {} does not exceed {}", pair[1], pair[0]),
            ));
        }
        Ok(())
    }
}

/// Total function from composite score to level
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskLevelClassifier {
    boundaries: LevelBoundaries,
}

impl RiskLevelClassifier {
    pub fn new(boundaries: LevelBoundaries) -> Result<Self> {
        boundaries.validate()?;
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &LevelBoundaries {
        &self.boundaries
    }

    pub fn classify(&self, score: Score) -> RiskLevel {
        let b = &self.boundaries;
        if score <= b.minimal_max {
            RiskLevel::Minimal
        } else if score <= b.low_max {
            RiskLevel::Low
        } else if score <= b.medium_max {
            RiskLevel::Medium
        } else if score <= b.high_max {
            RiskLevel::High
        } else {
            RiskLevel::Extreme
        }
    }
}
