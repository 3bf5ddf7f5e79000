use crate::entities::RiskLevel;
use crate::values::{AsOf, Score};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four independent inputs to the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskComponent {
    Correlation,
    Leverage,
    Liquidity,
    Regulatory,
}

impl RiskComponent {
    pub const ALL: [RiskComponent; 4] = [
        RiskComponent::Correlation,
        RiskComponent::Leverage,
        RiskComponent::Liquidity,
        RiskComponent::Regulatory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskComponent::Correlation => "correlation",
            RiskComponent::Leverage => "leverage",
            RiskComponent::Liquidity => "liquidity",
            RiskComponent::Regulatory => "regulatory",
        }
    }
}

impl fmt::Display for RiskComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-scores produced by the component scorers, each expected in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskComponentScores {
    pub correlation: Score,
    pub leverage: Score,
    pub liquidity: Score,
    pub regulatory: Score,
}

impl RiskComponentScores {
    pub fn new(correlation: Score, leverage: Score, liquidity: Score, regulatory: Score) -> Self {
        Self {
            correlation,
            leverage,
            liquidity,
            regulatory,
        }
    }

    pub fn get(&self, component: RiskComponent) -> Score {
        match component {
            RiskComponent::Correlation => self.correlation,
            RiskComponent::Leverage => self.leverage,
            RiskComponent::Liquidity => self.liquidity,
            RiskComponent::Regulatory => self.regulatory,
        }
    }

    /// Copy with every component clamped into [0, 1]
    pub fn clamped(&self) -> Self {
        let clamp = |v: Score| v.clamp(Decimal::ZERO, Decimal::ONE);
        Self {
            correlation: clamp(self.correlation),
            leverage: clamp(self.leverage),
            liquidity: clamp(self.liquidity),
            regulatory: clamp(self.regulatory),
        }
    }

    /// Components paired with their values, in weight order
    pub fn iter(&self) -> impl Iterator<Item = (RiskComponent, Score)> + '_ {
        RiskComponent::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Composite systemic risk score at a point in time
///
/// Computed fresh per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Composite value in [0, 1]
    pub value: Score,
    /// Band the value falls in
    pub level: RiskLevel,
    /// Date the underlying indicators were observed at
    pub as_of: AsOf,
    /// Sub-scores the composite was built from (post-clamp)
    pub components: RiskComponentScores,
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}) as of {}", self.level, self.value, self.as_of)
    }
}
