//! Position Sizing
//!
//! | Level   | Long % | Long lev | Short % | Short lev |
//! |---------|--------|----------|---------|-----------|
//! | MINIMAL | 54%    | 4.0x     | 10%     | 4.0x      |
//! | LOW     | 44%    | 4.0x     | 20%     | 4.0x      |
//! | MEDIUM  | 14%    | 2.5x     | 46%     | 4.0x      |
//! | HIGH    | 8%     | 1.5x     | 50%     | 4.0x      |
//! | EXTREME | 0%     | 0.0x     | 50%     | 4.0x      |
//!
//! MEDIUM or HIGH with an improving trend switches to the trend override
//! (50% / 20%, 4.0x both).

use crate::error::{Result, TableError};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sentinel_core::{
    EquityPct, Leverage, RiskLevel, SizingDecision, SizingType, TrendClassification,
};

/// One row of the sizing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingRow {
    pub long_equity_pct: EquityPct,
    pub long_leverage: Leverage,
    pub short_equity_pct: EquityPct,
    pub short_leverage: Leverage,
    /// Multiple of the base risk-per-trade for longs
    pub long_multiplier: Decimal,
    /// Multiple of the base risk-per-trade for shorts
    pub short_multiplier: Decimal,
}

impl SizingRow {
    pub const fn new(
        long_equity_pct: EquityPct,
        long_leverage: Leverage,
        short_equity_pct: EquityPct,
        short_leverage: Leverage,
        long_multiplier: Decimal,
        short_multiplier: Decimal,
    ) -> Self {
        Self {
            long_equity_pct,
            long_leverage,
            short_equity_pct,
            short_leverage,
            long_multiplier,
            short_multiplier,
        }
    }

    fn to_decision(self, sizing_type: SizingType) -> SizingDecision {
        SizingDecision {
            long_equity_pct: self.long_equity_pct,
            short_equity_pct: self.short_equity_pct,
            long_leverage: self.long_leverage,
            short_leverage: self.short_leverage,
            long_multiplier: self.long_multiplier,
            short_multiplier: self.short_multiplier,
            sizing_type,
        }
    }

    fn validate(&self, row: &str) -> Result<()> {
        let pct_ok = |p: Decimal| p >= Decimal::ZERO && p <= Decimal::ONE;
        if !pct_ok(self.long_equity_pct) || !pct_ok(self.short_equity_pct) {
            return Err(TableError::invalid(
                "sizing",
                format!("{} equity percentage outside [0, 1]", row),
            ));
        }
        if self.long_leverage < Decimal::ZERO || self.short_leverage < Decimal::ZERO {
            return Err(TableError::invalid(
                "sizing",
                format!("{} leverage is negative", row),
            ));
        }
        if self.long_multiplier < Decimal::ZERO || self.short_multiplier < Decimal::ZERO {
            return Err(TableError::invalid(
                "sizing",
                format!("{} size multiplier is negative", row),
            ));
        }
        Ok(())
    }
}

/// Sizing rows per level plus the improving-trend override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingTable {
    pub minimal: SizingRow,
    pub low: SizingRow,
    pub medium: SizingRow,
    pub high: SizingRow,
    pub extreme: SizingRow,
    pub trend_override: SizingRow,
}

impl Default for SizingTable {
    fn default() -> Self {
        Self {
            minimal: SizingRow::new(dec!(0.54), dec!(4.0), dec!(0.10), dec!(4.0), dec!(1.35), dec!(0.25)),
            low: SizingRow::new(dec!(0.44), dec!(4.0), dec!(0.20), dec!(4.0), dec!(1.10), dec!(0.50)),
            medium: SizingRow::new(dec!(0.14), dec!(2.5), dec!(0.46), dec!(4.0), dec!(0.35), dec!(1.15)),
            high: SizingRow::new(dec!(0.08), dec!(1.5), dec!(0.50), dec!(4.0), dec!(0.20), dec!(1.25)),
            extreme: SizingRow::new(dec!(0), dec!(0.0), dec!(0.50), dec!(4.0), dec!(0), dec!(1.25)),
            trend_override: SizingRow::new(dec!(0.50), dec!(4.0), dec!(0.20), dec!(4.0), dec!(1.25), dec!(0.50)),
        }
    }
}

impl SizingTable {
    pub fn row(&self, level: RiskLevel) -> &SizingRow {
        match level {
            RiskLevel::Minimal => &self.minimal,
            RiskLevel::Low => &self.low,
            RiskLevel::Medium => &self.medium,
            RiskLevel::High => &self.high,
            RiskLevel::Extreme => &self.extreme,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for level in RiskLevel::ALL {
            self.row(level).validate(level.as_str())?;
        }
        self.trend_override.validate("trend override")?;

        // Higher risk never grows the long book or shrinks the short book
        for pair in RiskLevel::ALL.windows(2) {
            let (lower, higher) = (self.row(pair[0]), self.row(pair[1]));
            if higher.long_equity_pct > lower.long_equity_pct {
                return Err(TableError::invalid(
                    "sizing",
                    format!(
                        "{} long share {} exceeds {} long share {}",
                        pair[1], higher.long_equity_pct, pair[0], lower.long_equity_pct
                    ),
                ));
            }
            if higher.short_equity_pct < lower.short_equity_pct {
                return Err(TableError::invalid(
                    "sizing",
                    format!(
                        "{} short share {} below {} short share {}",
                        pair[1], higher.short_equity_pct, pair[0], lower.short_equity_pct
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Maps (level, trend) to a sizing decision
#[derive(Debug, Clone, Default)]
pub struct PositionSizingEngine {
    table: SizingTable,
}

impl PositionSizingEngine {
    pub fn new(table: SizingTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &SizingTable {
        &self.table
    }

    /// Whether the improving-trend override applies
    pub fn trend_override_applies(level: RiskLevel, trend: Option<TrendClassification>) -> bool {
        matches!(level, RiskLevel::Medium | RiskLevel::High)
            && trend == Some(TrendClassification::Improving)
    }

    pub fn size(&self, level: RiskLevel, trend: Option<TrendClassification>) -> SizingDecision {
        if Self::trend_override_applies(level, trend) {
            debug!("[RISK] {} with improving trend, using trend-based sizing", level);
            return self.table.trend_override.to_decision(SizingType::TrendBased);
        }
        self.table.row(level).to_decision(SizingType::RiskBased)
    }
}
