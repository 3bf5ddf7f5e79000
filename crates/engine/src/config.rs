//! Engine Configuration
//!
//! One serde document holding every table the engine consults. Missing
//! sections fall back to the canonical defaults, and the whole document is
//! validated before an engine is built.
//!
//! ```json
//! {
//!   "trend": { "mode": "simple", "same_tolerance": "0.05" },
//!   "hedge": { "thresholds": { "mode": "single", "threshold": "0.475" } },
//!   "retrieval": { "timeout_ms": 5000, "max_concurrent_fetches": 8 }
//! }
//! ```

use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sentinel_core::TrendMode;
use sentinel_decision::{HedgeConfig, HoldPeriodTable, SizingTable};
use sentinel_ports::SeriesId;
use sentinel_scoring::{CalibrationConfig, LevelBoundaries, LeverageParams, NetworkParams};
use std::path::Path;
use std::time::Duration;

/// Historical reference dates and comparison rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub mode: TrendMode,
    /// Simple mode: |current - 2m| below this counts as sustained risk
    /// for the HIGH hedge rule
    pub same_tolerance: Decimal,
    /// Offset of the most recent reference date
    pub recent_days: u32,
    /// Offset of the middle reference date, in calendar months
    pub mid_months: u32,
    /// Offset of the oldest reference date, in calendar months
    pub far_months: u32,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            mode: TrendMode::Strict,
            same_tolerance: dec!(0.05),
            recent_days: 14,
            mid_months: 1,
            far_months: 2,
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.same_tolerance < Decimal::ZERO || self.same_tolerance >= Decimal::ONE {
            return Err(ConfigError::invalid(
                "trend",
                format!("same_tolerance {} outside [0, 1)", self.same_tolerance),
            ));
        }
        if self.recent_days == 0 || self.mid_months == 0 {
            return Err(ConfigError::invalid("trend", "offsets must be positive"));
        }
        // A month is at least 28 days, so this keeps the reference dates
        // strictly chronological
        if self.recent_days >= 28 * self.mid_months {
            return Err(ConfigError::invalid(
                "trend",
                format!(
                    "recent_days {} must fall inside {} month(s)",
                    self.recent_days, self.mid_months
                ),
            ));
        }
        if self.far_months <= self.mid_months {
            return Err(ConfigError::invalid(
                "trend",
                format!(
                    "far_months {} must exceed mid_months {}",
                    self.far_months, self.mid_months
                ),
            ));
        }
        Ok(())
    }
}

/// Identifiers of the series the snapshot loader requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesCatalog {
    /// Institution tickers for the correlation network
    pub universe: Vec<String>,
    /// How many of the universe (in order) feed the leverage indicators
    pub fundamentals_institutions: usize,
    pub price_prefix: String,
    pub fundamentals_prefix: String,
    pub volatility_index: String,
    pub ten_year_yield: String,
    pub three_month_yield: String,
    pub financial_sector: String,
    pub regulatory_proxies: Vec<String>,
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        let universe = [
            "JPM", "BAC", "WFC", "C", "GS", "MS", "AXP", "USB", "PNC", "TFC", "COF", "SCHW",
            "BLK", "CB", "AON", "MMC", "AIG", "MET", "PRU", "ALL", "TRV", "PGR", "HIG", "PFG",
            "LNC", "BEN", "NTRS", "STT", "BK", "STI",
        ];
        let proxies = [
            "regulatory_uncertainty",
            "capital_adequacy_risk",
            "political_risk",
            "regulatory_changes",
        ];
        Self {
            universe: universe.iter().map(|t| t.to_string()).collect(),
            fundamentals_institutions: 10,
            price_prefix: "px:".to_string(),
            fundamentals_prefix: "fund:".to_string(),
            volatility_index: "idx:^VIX".to_string(),
            ten_year_yield: "rate:^TNX".to_string(),
            three_month_yield: "rate:^IRX".to_string(),
            financial_sector: "px:XLF".to_string(),
            regulatory_proxies: proxies.iter().map(|p| format!("reg:{}", p)).collect(),
        }
    }
}

impl SeriesCatalog {
    pub fn price(&self, ticker: &str) -> SeriesId {
        SeriesId::new(format!("{}{}", self.price_prefix, ticker))
    }

    pub fn debt_to_equity(&self, ticker: &str) -> SeriesId {
        SeriesId::new(format!("{}{}:debt_to_equity", self.fundamentals_prefix, ticker))
    }

    pub fn interest_coverage(&self, ticker: &str) -> SeriesId {
        SeriesId::new(format!(
            "{}{}:interest_coverage",
            self.fundamentals_prefix, ticker
        ))
    }

    /// Tickers whose fundamentals are loaded
    pub fn fundamentals_universe(&self) -> &[String] {
        let n = self.fundamentals_institutions.min(self.universe.len());
        &self.universe[..n]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::invalid("series", "universe is empty"));
        }
        if self.fundamentals_institutions == 0 {
            return Err(ConfigError::invalid(
                "series",
                "fundamentals_institutions must be positive",
            ));
        }
        if self.volatility_index.trim().is_empty() {
            return Err(ConfigError::invalid("series", "volatility_index is empty"));
        }
        if self.regulatory_proxies.is_empty() {
            return Err(ConfigError::invalid("series", "no regulatory proxies"));
        }
        Ok(())
    }
}

/// Lookback windows and derivation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub correlation_lookback_days: u32,
    pub liquidity_lookback_days: u32,
    /// Window searched for the latest fundamentals and proxy readings
    pub snapshot_lookback_days: u32,
    pub network: NetworkParams,
    pub leverage: LeverageParams,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            correlation_lookback_days: 252,
            liquidity_lookback_days: 60,
            snapshot_lookback_days: 365,
            network: NetworkParams::default(),
            leverage: LeverageParams::default(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.correlation_lookback_days == 0
            || self.liquidity_lookback_days == 0
            || self.snapshot_lookback_days == 0
        {
            return Err(ConfigError::invalid("indicators", "lookbacks must be positive"));
        }
        if self.network.min_institutions < 2 {
            return Err(ConfigError::invalid(
                "indicators",
                "network needs at least two institutions",
            ));
        }
        if !(0.0..1.0).contains(&self.network.edge_threshold) {
            return Err(ConfigError::invalid(
                "indicators",
                format!("edge_threshold {} outside [0, 1)", self.network.edge_threshold),
            ));
        }
        Ok(())
    }
}

/// Market-data retrieval limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Deadline applied to every series fetch
    pub timeout_ms: u64,
    pub max_concurrent_fetches: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_concurrent_fetches: 4,
        }
    }
}

impl RetrievalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("retrieval", "timeout_ms must be positive"));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::invalid(
                "retrieval",
                "max_concurrent_fetches must be positive",
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub levels: LevelBoundaries,
    pub calibration: CalibrationConfig,
    pub sizing: SizingTable,
    pub hold_period: HoldPeriodTable,
    pub hedge: HedgeConfig,
    pub trend: TrendConfig,
    pub indicators: IndicatorConfig,
    pub series: SeriesCatalog,
    pub retrieval: RetrievalConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.levels.validate()?;
        self.calibration.validate()?;
        self.sizing.validate()?;
        self.hold_period.validate()?;
        self.hedge.validate()?;
        self.trend.validate()?;
        self.indicators.validate()?;
        self.series.validate()?;
        self.retrieval.validate()
    }
}
