//! Calibration Tables
//!
//! Step functions mapping raw indicator values to score contributions.
//! Thresholds live here as configuration rather than as constants buried in
//! the scorers, so they can be audited and tested on their own.
//!
//! A [`StepTable`] lists its steps from most to least severe. The first step
//! whose threshold the value satisfies contributes; otherwise nothing does.

use crate::error::{Result, ScoringError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How a value is compared against a step threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `value > threshold`
    Above,
    /// `value >= threshold`
    AtLeast,
    /// `value < threshold`
    Below,
    /// `value <= threshold`
    AtMost,
}

impl Comparison {
    pub fn matches(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::AtLeast => value >= threshold,
            Comparison::Below => value < threshold,
            Comparison::AtMost => value <= threshold,
        }
    }

    /// Higher values are riskier
    fn ascending_risk(&self) -> bool {
        matches!(self, Comparison::Above | Comparison::AtLeast)
    }
}

/// One breakpoint of a step table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub threshold: f64,
    pub contribution: Decimal,
}

impl Step {
    pub fn new(threshold: f64, contribution: Decimal) -> Self {
        Self {
            threshold,
            contribution,
        }
    }
}

/// Monotonic step function over a raw indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTable {
    pub comparison: Comparison,
    pub steps: Vec<Step>,
}

impl StepTable {
    pub fn new(comparison: Comparison, steps: Vec<Step>) -> Self {
        Self { comparison, steps }
    }

    /// `value > t` bands, most severe first
    pub fn above(steps: &[(f64, Decimal)]) -> Self {
        Self::from_pairs(Comparison::Above, steps)
    }

    /// `value < t` bands, most severe first
    pub fn below(steps: &[(f64, Decimal)]) -> Self {
        Self::from_pairs(Comparison::Below, steps)
    }

    fn from_pairs(comparison: Comparison, steps: &[(f64, Decimal)]) -> Self {
        Self {
            comparison,
            steps: steps.iter().map(|&(t, c)| Step::new(t, c)).collect(),
        }
    }

    /// Contribution for a value; NaN never matches
    pub fn contribution(&self, value: f64) -> Decimal {
        if value.is_nan() {
            return Decimal::ZERO;
        }
        self.steps
            .iter()
            .find(|s| self.comparison.matches(value, s.threshold))
            .map(|s| s.contribution)
            .unwrap_or(Decimal::ZERO)
    }

    /// Contribution for an indicator that may be absent
    pub fn contribution_opt(&self, value: Option<f64>) -> Decimal {
        value.map(|v| self.contribution(v)).unwrap_or(Decimal::ZERO)
    }

    /// Check ordering and ranges
    ///
    /// Thresholds must run from most to least severe, contributions must be
    /// non-increasing and each must lie in [0, 1]. An empty table is valid
    /// and always contributes zero.
    pub fn validate(&self, table: &str) -> Result<()> {
        for (i, step) in self.steps.iter().enumerate() {
            if !step.threshold.is_finite() {
                return Err(ScoringError::calibration(
                    table,
                    format!("step {} threshold is not finite", i),
                ));
            }
            if step.contribution < Decimal::ZERO || step.contribution > Decimal::ONE {
                return Err(ScoringError::calibration(
                    table,
                    format!("step {} contribution {} outside [0, 1]", i, step.contribution),
                ));
            }
        }
        for (i, pair) in self.steps.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let ordered = if self.comparison.ascending_risk() {
                next.threshold < prev.threshold
            } else {
                next.threshold > prev.threshold
            };
            if !ordered {
                return Err(ScoringError::calibration(
                    table,
                    format!(
                        "step {} threshold {} is not less severe than {}",
                        i + 1,
                        next.threshold,
                        prev.threshold
                    ),
                ));
            }
            if next.contribution > prev.contribution {
                return Err(ScoringError::calibration(
                    table,
                    format!(
                        "step {} contribution {} exceeds preceding {}",
                        i + 1,
                        next.contribution,
                        prev.contribution
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Correlation-network calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationCalibration {
    /// Average pairwise return correlation
    pub avg_correlation: StepTable,
    /// Share of institution pairs linked in the correlation network
    pub network_density: StepTable,
    /// Degree centralization of the correlation network
    pub network_centralization: StepTable,
    /// Count of pairs above the edge threshold
    pub high_correlation_pairs: StepTable,
}

impl Default for CorrelationCalibration {
    fn default() -> Self {
        Self {
            avg_correlation: StepTable::above(&[
                (0.8, dec!(0.4)),
                (0.6, dec!(0.3)),
                (0.4, dec!(0.2)),
            ]),
            network_density: StepTable::above(&[(0.7, dec!(0.3)), (0.5, dec!(0.2))]),
            network_centralization: StepTable::above(&[(0.8, dec!(0.3)), (0.6, dec!(0.2))]),
            // Not part of the default calibration; available for tuning
            high_correlation_pairs: StepTable::above(&[]),
        }
    }
}

impl CorrelationCalibration {
    pub fn validate(&self) -> Result<()> {
        self.avg_correlation.validate("correlation.avg_correlation")?;
        self.network_density.validate("correlation.network_density")?;
        self.network_centralization
            .validate("correlation.network_centralization")?;
        self.high_correlation_pairs
            .validate("correlation.high_correlation_pairs")
    }
}

/// Leverage calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeverageCalibration {
    pub avg_debt_to_equity: StepTable,
    pub avg_interest_coverage: StepTable,
    /// Institutions with debt-to-equity above the high-leverage cut-off
    pub high_leverage_count: StepTable,
    /// Institutions with interest coverage below the low-coverage cut-off
    pub low_coverage_count: StepTable,
}

impl Default for LeverageCalibration {
    fn default() -> Self {
        Self {
            avg_debt_to_equity: StepTable::above(&[(3.0, dec!(0.3)), (2.0, dec!(0.2))]),
            avg_interest_coverage: StepTable::below(&[(2.0, dec!(0.3)), (3.0, dec!(0.2))]),
            high_leverage_count: StepTable::above(&[(5.0, dec!(0.2)), (3.0, dec!(0.1))]),
            low_coverage_count: StepTable::above(&[(5.0, dec!(0.2)), (3.0, dec!(0.1))]),
        }
    }
}

impl LeverageCalibration {
    pub fn validate(&self) -> Result<()> {
        self.avg_debt_to_equity.validate("leverage.avg_debt_to_equity")?;
        self.avg_interest_coverage
            .validate("leverage.avg_interest_coverage")?;
        self.high_leverage_count.validate("leverage.high_leverage_count")?;
        self.low_coverage_count.validate("leverage.low_coverage_count")
    }
}

/// Liquidity calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityCalibration {
    pub vix_mean: StepTable,
    /// Added when the 10Y-3M spread went negative inside the window
    pub yield_curve_inversion: Decimal,
    /// Annualized volatility of the financial-sector benchmark
    pub financial_volatility: StepTable,
    /// Peak-to-trough drawdown of the financial-sector benchmark (negative)
    pub financial_max_drawdown: StepTable,
}

impl Default for LiquidityCalibration {
    fn default() -> Self {
        Self {
            vix_mean: StepTable::above(&[(30.0, dec!(0.3)), (20.0, dec!(0.2))]),
            yield_curve_inversion: dec!(0.3),
            financial_volatility: StepTable::above(&[(0.4, dec!(0.2)), (0.3, dec!(0.1))]),
            financial_max_drawdown: StepTable::below(&[(-0.2, dec!(0.2)), (-0.1, dec!(0.1))]),
        }
    }
}

impl LiquidityCalibration {
    pub fn validate(&self) -> Result<()> {
        self.vix_mean.validate("liquidity.vix_mean")?;
        if self.yield_curve_inversion < Decimal::ZERO || self.yield_curve_inversion > Decimal::ONE {
            return Err(ScoringError::calibration(
                "liquidity.yield_curve_inversion",
                format!("{} outside [0, 1]", self.yield_curve_inversion),
            ));
        }
        self.financial_volatility
            .validate("liquidity.financial_volatility")?;
        self.financial_max_drawdown
            .validate("liquidity.financial_max_drawdown")
    }
}

/// Calibration for all four component scorers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub correlation: CorrelationCalibration,
    pub leverage: LeverageCalibration,
    pub liquidity: LiquidityCalibration,
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        self.correlation.validate()?;
        self.leverage.validate()?;
        self.liquidity.validate()
    }
}
