use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use sentinel_core::{HoldPeriod, RiskLevel};

/// Long/short hold days for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRow {
    pub long_days: u32,
    pub short_days: u32,
}

impl HoldRow {
    pub const fn new(long_days: u32, short_days: u32) -> Self {
        Self {
            long_days,
            short_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldPeriodTable {
    pub minimal: HoldRow,
    pub low: HoldRow,
    pub medium: HoldRow,
    pub high: HoldRow,
    pub extreme: HoldRow,
    /// Gold leg hold while a hedge is active
    pub gold_days: u32,
}

impl Default for HoldPeriodTable {
    fn default() -> Self {
        Self {
            minimal: HoldRow::new(10, 3),
            low: HoldRow::new(10, 3),
            medium: HoldRow::new(6, 5),
            high: HoldRow::new(4, 6),
            extreme: HoldRow::new(0, 7),
            gold_days: 20,
        }
    }
}

impl HoldPeriodTable {
    pub fn row(&self, level: RiskLevel) -> &HoldRow {
        match level {
            RiskLevel::Minimal => &self.minimal,
            RiskLevel::Low => &self.low,
            RiskLevel::Medium => &self.medium,
            RiskLevel::High => &self.high,
            RiskLevel::Extreme => &self.extreme,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gold_days == 0 {
            return Err(TableError::invalid(
                "hold_period",
                "gold leg hold must be at least one day",
            ));
        }
        for pair in RiskLevel::ALL.windows(2) {
            let (lower, higher) = (self.row(pair[0]), self.row(pair[1]));
            if higher.long_days > lower.long_days {
                return Err(TableError::invalid(
                    "hold_period",
                    format!(
                        "{} long hold {}d exceeds {} long hold {}d",
                        pair[1], higher.long_days, pair[0], lower.long_days
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Maps a level to hold-day counts per leg
#[derive(Debug, Clone, Default)]
pub struct HoldPeriodEngine {
    table: HoldPeriodTable,
}

impl HoldPeriodEngine {
    pub fn new(table: HoldPeriodTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &HoldPeriodTable {
        &self.table
    }

    pub fn hold_period(&self, level: RiskLevel, hedge_active: bool) -> HoldPeriod {
        let row = self.table.row(level);
        HoldPeriod {
            long_days: row.long_days,
            short_days: row.short_days,
            gold_days: if hedge_active { self.table.gold_days } else { 0 },
        }
    }
}
