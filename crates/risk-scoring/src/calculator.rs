//! Composite risk score
//!
//! `score = clamp01(0.30·correlation + 0.25·leverage + 0.25·liquidity + 0.20·regulatory)`

use crate::classifier::RiskLevelClassifier;
use crate::error::{Result, ScoringError};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sentinel_core::{AsOf, RiskComponent, RiskComponentScores, RiskScore, RiskWarning, Score};

pub const CORRELATION_WEIGHT: Decimal = dec!(0.30);
pub const LEVERAGE_WEIGHT: Decimal = dec!(0.25);
pub const LIQUIDITY_WEIGHT: Decimal = dec!(0.25);
pub const REGULATORY_WEIGHT: Decimal = dec!(0.20);

pub fn weight(component: RiskComponent) -> Decimal {
    match component {
        RiskComponent::Correlation => CORRELATION_WEIGHT,
        RiskComponent::Leverage => LEVERAGE_WEIGHT,
        RiskComponent::Liquidity => LIQUIDITY_WEIGHT,
        RiskComponent::Regulatory => REGULATORY_WEIGHT,
    }
}

/// A score plus anything that had to be corrected to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub score: RiskScore,
    pub warnings: Vec<RiskWarning>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScoreCalculator {
    classifier: RiskLevelClassifier,
}

impl RiskScoreCalculator {
    pub fn new(classifier: RiskLevelClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &RiskLevelClassifier {
        &self.classifier
    }

    /// Weighted sum of in-range components, clamped into [0, 1]
    pub fn composite(components: &RiskComponentScores) -> Score {
        components
            .iter()
            .map(|(c, v)| weight(c) * v)
            .sum::<Decimal>()
            .clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// Score components, clamping any that fall outside [0, 1]
    ///
    /// Out-of-range components are logged and reported as warnings rather
    /// than aborting.
    pub fn compute(&self, components: RiskComponentScores, as_of: AsOf) -> ScoreOutcome {
        let warnings: Vec<RiskWarning> = components
            .iter()
            .filter(|(_, v)| !in_unit_range(*v))
            .map(|(component, value)| {
                warn!(
                    "[RISK] {} component score {} out of range as of {}, clamping",
                    component, value, as_of
                );
                RiskWarning::InvalidComponentScore {
                    as_of,
                    component,
                    value,
                }
            })
            .collect();

        ScoreOutcome {
            score: self.build(components.clamped(), as_of),
            warnings,
        }
    }

    /// Score components, rejecting the first that falls outside [0, 1]
    pub fn try_compute(&self, components: RiskComponentScores, as_of: AsOf) -> Result<RiskScore> {
        if let Some((component, value)) = components.iter().find(|(_, v)| !in_unit_range(*v)) {
            return Err(ScoringError::InvalidComponentScore {
                as_of,
                component,
                value,
            });
        }
        Ok(self.build(components, as_of))
    }

    fn build(&self, components: RiskComponentScores, as_of: AsOf) -> RiskScore {
        let value = Self::composite(&components);
        RiskScore {
            value,
            level: self.classifier.classify(value),
            as_of,
            components,
        }
    }
}

fn in_unit_range(v: Score) -> bool {
    v >= Decimal::ZERO && v <= Decimal::ONE
}
