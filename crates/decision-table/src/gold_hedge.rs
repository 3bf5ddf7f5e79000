//! Gold Hedge Rules
//!
//! Rules are evaluated in order, first match wins:
//!
//! ```text
//!  EXTREME ───────────────────────────────► hedge (automatic / fallback)
//!  LOW, MINIMAL ──────────────────────────► no hedge
//!  score <  min ──────────────────────────► no hedge (below threshold)
//!  score >= auto ─────────────────────────► hedge (automatic)
//!  min <= score < auto:
//!     MEDIUM + Deteriorating ─────────────► hedge
//!     HIGH + Deteriorating/Same ──────────► hedge
//!     otherwise ──────────────────────────► no hedge
//! ```

use crate::error::{Result, TableError};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sentinel_core::{
    EquityPct, GoldHedgeDecision, HedgeReason, Leverage, RiskLevel, Score, Symbol,
    TrendClassification,
};

/// Score thresholds that gate the hedge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HedgeThresholds {
    /// Below `min` never hedges, at or above `auto` always hedges, the band
    /// between is decided by trend
    TwoTier { min: Score, auto: Score },
    /// Hedge iff the score is strictly above `threshold`
    Single { threshold: Score },
}

impl Default for HedgeThresholds {
    fn default() -> Self {
        HedgeThresholds::TwoTier {
            min: dec!(0.41),
            auto: dec!(0.48),
        }
    }
}

impl HedgeThresholds {
    /// Single-threshold variant from the strategy's standalone configuration
    pub fn single() -> Self {
        HedgeThresholds::Single {
            threshold: dec!(0.475),
        }
    }

    /// Score at which the hedge fires regardless of trend
    fn automatic(&self, score: Score) -> bool {
        match *self {
            HedgeThresholds::TwoTier { auto, .. } => score >= auto,
            HedgeThresholds::Single { threshold } => score > threshold,
        }
    }

    fn below_minimum(&self, score: Score) -> bool {
        match *self {
            HedgeThresholds::TwoTier { min, .. } => score < min,
            HedgeThresholds::Single { threshold } => score <= threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |s: Score| s > Decimal::ZERO && s <= Decimal::ONE;
        match *self {
            HedgeThresholds::TwoTier { min, auto } => {
                if !in_range(min) || !in_range(auto) {
                    return Err(TableError::invalid("gold_hedge", "thresholds outside (0, 1]"));
                }
                if min > auto {
                    return Err(TableError::invalid(
                        "gold_hedge",
                        format!("minimum {} exceeds automatic {}", min, auto),
                    ));
                }
            }
            HedgeThresholds::Single { threshold } => {
                if !in_range(threshold) {
                    return Err(TableError::invalid("gold_hedge", "threshold outside (0, 1]"));
                }
            }
        }
        Ok(())
    }
}

/// Equity share allocated to gold per hedging level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeAllocations {
    pub medium: EquityPct,
    pub high: EquityPct,
    pub extreme: EquityPct,
}

impl Default for HedgeAllocations {
    fn default() -> Self {
        Self {
            medium: dec!(0.40),
            high: dec!(0.42),
            extreme: dec!(0.50),
        }
    }
}

impl HedgeAllocations {
    /// `None` for levels that never hedge
    pub fn for_level(&self, level: RiskLevel) -> Option<EquityPct> {
        match level {
            RiskLevel::Medium => Some(self.medium),
            RiskLevel::High => Some(self.high),
            RiskLevel::Extreme => Some(self.extreme),
            RiskLevel::Minimal | RiskLevel::Low => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeConfig {
    pub thresholds: HedgeThresholds,
    pub allocations: HedgeAllocations,
    /// Hedge instrument
    pub symbol: Symbol,
    pub leverage: Leverage,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            thresholds: HedgeThresholds::default(),
            allocations: HedgeAllocations::default(),
            symbol: "GC=F".to_string(),
            leverage: dec!(3.2),
        }
    }
}

impl HedgeConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        let a = &self.allocations;
        for pct in [a.medium, a.high, a.extreme] {
            if pct <= Decimal::ZERO || pct > Decimal::ONE {
                return Err(TableError::invalid(
                    "gold_hedge",
                    format!("allocation {} outside (0, 1]", pct),
                ));
            }
        }
        if a.medium > a.high || a.high > a.extreme {
            return Err(TableError::invalid(
                "gold_hedge",
                format!(
                    "allocations must not fall as risk rises: {} / {} / {}",
                    a.medium, a.high, a.extreme
                ),
            ));
        }
        if self.symbol.trim().is_empty() {
            return Err(TableError::invalid("gold_hedge", "hedge symbol is empty"));
        }
        if self.leverage <= Decimal::ZERO {
            return Err(TableError::invalid(
                "gold_hedge",
                format!("leverage {} must be positive", self.leverage),
            ));
        }
        Ok(())
    }
}

/// Maps (score, level, trend) to a hedge recommendation
#[derive(Debug, Clone, Default)]
pub struct GoldHedgeEngine {
    config: HedgeConfig,
}

impl GoldHedgeEngine {
    pub fn new(config: HedgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HedgeConfig {
        &self.config
    }

    pub fn decide(
        &self,
        score: Score,
        level: RiskLevel,
        trend: Option<TrendClassification>,
    ) -> GoldHedgeDecision {
        let thresholds = &self.config.thresholds;

        let Some(allocation) = self.config.allocations.for_level(level) else {
            let reason = if thresholds.below_minimum(score) {
                HedgeReason::BelowThreshold
            } else {
                HedgeReason::NotApplicable
            };
            return self.decline(reason);
        };

        if level == RiskLevel::Extreme {
            let reason = if thresholds.automatic(score) {
                HedgeReason::AutomaticThreshold
            } else {
                HedgeReason::ExtremeFallback
            };
            return self.recommend(allocation, reason);
        }

        if thresholds.below_minimum(score) {
            return self.decline(HedgeReason::BelowThreshold);
        }
        if thresholds.automatic(score) {
            return self.recommend(allocation, HedgeReason::AutomaticThreshold);
        }

        use TrendClassification::{Deteriorating, Same};
        match (level, trend) {
            (RiskLevel::Medium, Some(Deteriorating)) => {
                self.recommend(allocation, HedgeReason::MediumDeteriorating)
            }
            (RiskLevel::High, Some(Deteriorating | Same)) => {
                self.recommend(allocation, HedgeReason::HighSustained)
            }
            _ => self.decline(HedgeReason::TrendConditionsNotMet),
        }
    }

    fn recommend(&self, allocation_pct: EquityPct, reason: HedgeReason) -> GoldHedgeDecision {
        debug!(
            "[RISK] Gold hedge recommended: {} at {} ({})",
            self.config.symbol, allocation_pct, reason
        );
        GoldHedgeDecision {
            recommended: true,
            allocation_pct,
            reason,
            symbol: self.config.symbol.clone(),
            leverage: self.config.leverage,
        }
    }

    fn decline(&self, reason: HedgeReason) -> GoldHedgeDecision {
        GoldHedgeDecision::not_recommended(reason, self.config.symbol.clone(), self.config.leverage)
    }
}
