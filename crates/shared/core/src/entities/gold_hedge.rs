use crate::values::{EquityPct, Leverage, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which hedge rule decided the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HedgeReason {
    /// Score below the minimum hedge threshold
    BelowThreshold,
    /// Score at or above the automatic threshold
    AutomaticThreshold,
    /// MEDIUM risk with a deteriorating trend inside the trend band
    MediumDeteriorating,
    /// HIGH risk with a deteriorating or flat trend inside the trend band
    HighSustained,
    /// Inside the trend band but no trend rule matched
    TrendConditionsNotMet,
    /// EXTREME level hedges even when the score alone would not
    ExtremeFallback,
    /// LOW/MINIMAL are never hedged
    NotApplicable,
}

impl fmt::Display for HedgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HedgeReason::BelowThreshold => "below minimum hedge threshold",
            HedgeReason::AutomaticThreshold => "automatic hedge threshold reached",
            HedgeReason::MediumDeteriorating => "MEDIUM risk with deteriorating trend",
            HedgeReason::HighSustained => "HIGH risk with deteriorating/same trend",
            HedgeReason::TrendConditionsNotMet => "trend conditions not met",
            HedgeReason::ExtremeFallback => "EXTREME risk fallback",
            HedgeReason::NotApplicable => "level not eligible for hedging",
        };
        f.write_str(s)
    }
}

/// Gold hedge recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldHedgeDecision {
    pub recommended: bool,
    /// Fraction of equity to allocate; zero when not recommended
    pub allocation_pct: EquityPct,
    pub reason: HedgeReason,
    /// Hedge instrument
    pub symbol: Symbol,
    pub leverage: Leverage,
}

impl GoldHedgeDecision {
    pub fn not_recommended(reason: HedgeReason, symbol: Symbol, leverage: Leverage) -> Self {
        Self {
            recommended: false,
            allocation_pct: Decimal::ZERO,
            reason,
            symbol,
            leverage,
        }
    }
}
