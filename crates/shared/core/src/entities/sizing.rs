use crate::entities::Side;
use crate::values::{EquityPct, Leverage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which table produced a sizing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizingType {
    /// Base table keyed by risk level
    RiskBased,
    /// Improving-trend override for MEDIUM/HIGH
    TrendBased,
}

/// Position sizing for both legs, as fractions of available equity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingDecision {
    pub long_equity_pct: EquityPct,
    pub short_equity_pct: EquityPct,
    pub long_leverage: Leverage,
    pub short_leverage: Leverage,
    /// Size multiple of the base risk-per-trade for longs
    pub long_multiplier: Decimal,
    /// Size multiple of the base risk-per-trade for shorts
    pub short_multiplier: Decimal,
    pub sizing_type: SizingType,
}

impl SizingDecision {
    pub fn equity_pct(&self, side: Side) -> EquityPct {
        match side {
            Side::Long => self.long_equity_pct,
            Side::Short => self.short_equity_pct,
        }
    }

    pub fn leverage(&self, side: Side) -> Leverage {
        match side {
            Side::Long => self.long_leverage,
            Side::Short => self.short_leverage,
        }
    }

    pub fn multiplier(&self, side: Side) -> Decimal {
        match side {
            Side::Long => self.long_multiplier,
            Side::Short => self.short_multiplier,
        }
    }

    /// Position value for one leg given current equity
    ///
    /// The smaller of the equity-percentage size and the multiplier applied
    /// to the base risk-per-trade. Returns zero for non-positive equity.
    pub fn notional(&self, side: Side, equity: Decimal, base_risk_per_trade: Decimal) -> Decimal {
        if equity <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let by_equity = equity * self.equity_pct(side);
        let by_multiplier = equity * base_risk_per_trade * self.multiplier(side);
        by_equity.min(by_multiplier).max(Decimal::ZERO)
    }
}
