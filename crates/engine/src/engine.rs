//! Decision Engine
//!
//! Orchestrates one decision:
//!
//! ```text
//! DecisionRequest
//!       │
//!       ▼
//! ScoreSource::score_at(as_of) ──► RiskScore (level)
//!       │
//!       ├── level >= MEDIUM ──► HistoricalTrendAnalyzer ──► TrendResult
//!       │
//!       ▼
//! PositionSizingEngine ─┐
//! GoldHedgeEngine ──────┼──► Decision
//! HoldPeriodEngine ─────┘
//! ```
//!
//! The engine holds no mutable state between calls. Given the same market
//! data it returns the same decision.

use crate::cache::{CachedMarketData, IndicatorCache};
use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::snapshot::SnapshotLoader;
use crate::source::{MarketScoreSource, ScoreSource};
use crate::trend::{HistoricalTrendAnalyzer, TrendAnalysis};
use log::info;
use sentinel_core::{Decision, DecisionRequest, RiskLevel};
use sentinel_decision::{GoldHedgeEngine, HoldPeriodEngine, PositionSizingEngine};
use sentinel_ports::{DecisionObserver, LogObserver, MarketDataPort};
use sentinel_scoring::{ComponentScorers, RiskLevelClassifier, RiskScoreCalculator};
use std::sync::Arc;

/// Engine backed by market data through the shared indicator cache
pub type MarketDecisionEngine<M> = DecisionEngine<MarketScoreSource<CachedMarketData<M>>>;

pub struct DecisionEngine<S> {
    source: S,
    trend: HistoricalTrendAnalyzer,
    sizing: PositionSizingEngine,
    hold_period: HoldPeriodEngine,
    hedge: GoldHedgeEngine,
    observer: Arc<dyn DecisionObserver>,
}

impl<M: MarketDataPort> DecisionEngine<MarketScoreSource<CachedMarketData<M>>> {
    /// Build an engine over a market-data adapter with a private cache
    pub fn from_market_data(market_data: M, config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_cache(market_data, config, Arc::new(IndicatorCache::new()))
    }

    /// Build an engine that shares `cache` with other engines
    pub fn with_cache(
        market_data: M,
        config: EngineConfig,
        cache: Arc<IndicatorCache>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let snapshots = SnapshotLoader::new(
            CachedMarketData::new(market_data, cache),
            config.series.clone(),
            config.indicators.clone(),
            config.retrieval.clone(),
        );
        let calculator = RiskScoreCalculator::new(RiskLevelClassifier::new(config.levels)?);
        let source = MarketScoreSource::new(
            snapshots,
            ComponentScorers::new(&config.calibration),
            calculator,
        );
        info!(
            "[RISK] Decision engine ready ({:?} trend, {} fetches max, {:?} deadline)",
            config.trend.mode,
            config.retrieval.max_concurrent_fetches,
            config.retrieval.timeout()
        );
        Self::with_source(source, &config)
    }

    pub fn cache(&self) -> &Arc<IndicatorCache> {
        self.source.snapshots().market_data().cache()
    }
}

impl<S: ScoreSource> DecisionEngine<S> {
    /// Build an engine around any score source
    pub fn with_source(source: S, config: &EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.trend.validate()?;
        Ok(Self {
            source,
            trend: HistoricalTrendAnalyzer::new(config.trend.clone()),
            sizing: PositionSizingEngine::new(config.sizing.clone())?,
            hold_period: HoldPeriodEngine::new(config.hold_period.clone())?,
            hedge: GoldHedgeEngine::new(config.hedge.clone())?,
            observer: Arc::new(LogObserver),
        })
    }

    /// Replace the default log observer
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Produce the decision for one event
    ///
    /// Fails when the current snapshot cannot be loaded or any retrieval
    /// times out. Missing history only degrades the trend.
    pub async fn decide(&self, request: &DecisionRequest) -> Result<Decision> {
        match self.try_decide(request).await {
            Ok(decision) => {
                self.observer.on_decision(&decision);
                Ok(decision)
            }
            Err(e) => {
                self.observer.on_failure(request, &e.to_string());
                Err(e)
            }
        }
    }

    async fn try_decide(&self, request: &DecisionRequest) -> Result<Decision> {
        let current = self.source.score_at(request.as_of).await?;
        self.observer.on_score(&current.score);

        let mut warnings = current.warnings;
        let risk_score = current.score;
        let level = risk_score.level;

        let trend = if level.requires_trend() {
            let TrendAnalysis {
                result,
                warnings: trend_warnings,
            } = self.trend.analyze(&self.source, &risk_score).await?;
            for sample in &result.samples[..result.samples.len().saturating_sub(1)] {
                self.observer.on_score(&sample.score);
            }
            warnings.extend(trend_warnings);
            Some(result)
        } else {
            None
        };
        let classification = trend.as_ref().map(|t| t.classification);
        let hedge_trend = trend.as_ref().map(|t| t.hedge_classification());

        let sizing = self.sizing.size(level, classification);
        let gold_hedge = self.hedge.decide(risk_score.value, level, hedge_trend);
        let hold_period = self.hold_period.hold_period(level, gold_hedge.recommended);

        if level == RiskLevel::Extreme {
            info!(
                "[RISK] EXTREME systemic risk as of {}: longs disabled, hedging {}",
                request.as_of, gold_hedge.symbol
            );
        }
        for warning in &warnings {
            self.observer.on_warning(warning);
        }

        Ok(Decision {
            request: request.clone(),
            risk_score,
            trend,
            sizing,
            hold_period,
            gold_hedge,
            warnings,
        })
    }
}
