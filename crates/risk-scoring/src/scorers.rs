//! Component Scorers
//!
//! Each scorer maps one block of raw indicators to a sub-score in [0, 1] by
//! summing calibrated step contributions and capping at 1.
//!
//! ```text
//! CorrelationIndicators ──► CorrelationScorer ──┐
//! LeverageIndicators    ──► LeverageScorer    ──┤
//! LiquidityIndicators   ──► LiquidityScorer   ──┼──► RiskComponentScores
//! RegulatoryIndicators  ──► RegulatoryScorer  ──┘
//! ```

use crate::calibration::{
    CalibrationConfig, CorrelationCalibration, LeverageCalibration, LiquidityCalibration,
};
use crate::indicators::{
    CorrelationIndicators, LeverageIndicators, LiquidityIndicators, RawIndicators,
    RegulatoryIndicators,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sentinel_core::{RiskComponent, RiskComponentScores, Score};

/// Decimal places kept when converting a float statistic into a score
const SCORE_DP: u32 = 6;

/// A pure mapping from one component's raw indicators to a sub-score
pub trait ComponentScorer {
    type Indicators;

    fn component(&self) -> RiskComponent;

    /// Sub-score in [0, 1]
    fn score(&self, indicators: &Self::Indicators) -> Score;
}

fn capped(total: Decimal) -> Score {
    total.min(Decimal::ONE)
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationScorer {
    calibration: CorrelationCalibration,
}

impl CorrelationScorer {
    pub fn new(calibration: CorrelationCalibration) -> Self {
        Self { calibration }
    }
}

impl ComponentScorer for CorrelationScorer {
    type Indicators = CorrelationIndicators;

    fn component(&self) -> RiskComponent {
        RiskComponent::Correlation
    }

    fn score(&self, ind: &CorrelationIndicators) -> Score {
        let c = &self.calibration;
        capped(
            c.avg_correlation.contribution(ind.avg_correlation)
                + c.network_density.contribution(ind.network_density)
                + c.network_centralization
                    .contribution(ind.network_centralization)
                + c.high_correlation_pairs
                    .contribution(ind.high_correlation_pairs as f64),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeverageScorer {
    calibration: LeverageCalibration,
}

impl LeverageScorer {
    pub fn new(calibration: LeverageCalibration) -> Self {
        Self { calibration }
    }
}

impl ComponentScorer for LeverageScorer {
    type Indicators = LeverageIndicators;

    fn component(&self) -> RiskComponent {
        RiskComponent::Leverage
    }

    fn score(&self, ind: &LeverageIndicators) -> Score {
        let c = &self.calibration;
        capped(
            c.avg_debt_to_equity.contribution_opt(ind.avg_debt_to_equity)
                + c.avg_interest_coverage
                    .contribution_opt(ind.avg_interest_coverage)
                + c.high_leverage_count
                    .contribution(ind.high_leverage_count as f64)
                + c.low_coverage_count
                    .contribution(ind.low_coverage_count as f64),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LiquidityScorer {
    calibration: LiquidityCalibration,
}

impl LiquidityScorer {
    pub fn new(calibration: LiquidityCalibration) -> Self {
        Self { calibration }
    }
}

impl ComponentScorer for LiquidityScorer {
    type Indicators = LiquidityIndicators;

    fn component(&self) -> RiskComponent {
        RiskComponent::Liquidity
    }

    fn score(&self, ind: &LiquidityIndicators) -> Score {
        let c = &self.calibration;
        let inversion = if ind.yield_curve_inverted {
            c.yield_curve_inversion
        } else {
            Decimal::ZERO
        };
        capped(
            c.vix_mean.contribution(ind.vix_mean)
                + inversion
                + c.financial_volatility
                    .contribution_opt(ind.financial_volatility)
                + c.financial_max_drawdown
                    .contribution_opt(ind.financial_max_drawdown),
        )
    }
}

/// Averages proxy indicators that are already on the [0, 1] scale
#[derive(Debug, Clone, Copy, Default)]
pub struct RegulatoryScorer;

impl ComponentScorer for RegulatoryScorer {
    type Indicators = RegulatoryIndicators;

    fn component(&self) -> RiskComponent {
        RiskComponent::Regulatory
    }

    fn score(&self, ind: &RegulatoryIndicators) -> Score {
        let mean = Decimal::from_f64(ind.mean())
            .map(|d| d.round_dp(SCORE_DP))
            .unwrap_or(Decimal::ZERO);
        capped(mean.max(Decimal::ZERO))
    }
}

/// The four scorers wired from one calibration
#[derive(Debug, Clone, Default)]
pub struct ComponentScorers {
    pub correlation: CorrelationScorer,
    pub leverage: LeverageScorer,
    pub liquidity: LiquidityScorer,
    pub regulatory: RegulatoryScorer,
}

impl ComponentScorers {
    pub fn new(calibration: &CalibrationConfig) -> Self {
        Self {
            correlation: CorrelationScorer::new(calibration.correlation.clone()),
            leverage: LeverageScorer::new(calibration.leverage.clone()),
            liquidity: LiquidityScorer::new(calibration.liquidity.clone()),
            regulatory: RegulatoryScorer,
        }
    }

    pub fn score_all(&self, raw: &RawIndicators) -> RiskComponentScores {
        RiskComponentScores::new(
            self.correlation.score(&raw.correlation),
            self.leverage.score(&raw.leverage),
            self.liquidity.score(&raw.liquidity),
            self.regulatory.score(&raw.regulatory),
        )
    }
}
