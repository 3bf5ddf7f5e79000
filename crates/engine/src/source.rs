//! Score sources
//!
//! The engine asks a [`ScoreSource`] for the composite score at a date;
//! [`MarketScoreSource`] answers by loading a snapshot from market data and
//! running it through the scorers and calculator.

use crate::error::Result;
use crate::snapshot::SnapshotLoader;
use async_trait::async_trait;
use sentinel_core::AsOf;
use sentinel_ports::MarketDataPort;
use sentinel_scoring::{ComponentScorers, RiskScoreCalculator, ScoreOutcome};

/// Anything that can produce a classified score for a date
///
/// Implementations must only use information available at `as_of`.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn score_at(&self, as_of: AsOf) -> Result<ScoreOutcome>;
}

/// Scores computed from market data
pub struct MarketScoreSource<M> {
    snapshots: SnapshotLoader<M>,
    scorers: ComponentScorers,
    calculator: RiskScoreCalculator,
}

impl<M: MarketDataPort> MarketScoreSource<M> {
    pub fn new(
        snapshots: SnapshotLoader<M>,
        scorers: ComponentScorers,
        calculator: RiskScoreCalculator,
    ) -> Self {
        Self {
            snapshots,
            scorers,
            calculator,
        }
    }

    pub fn snapshots(&self) -> &SnapshotLoader<M> {
        &self.snapshots
    }

    pub fn calculator(&self) -> &RiskScoreCalculator {
        &self.calculator
    }
}

#[async_trait]
impl<M: MarketDataPort> ScoreSource for MarketScoreSource<M> {
    async fn score_at(&self, as_of: AsOf) -> Result<ScoreOutcome> {
        let raw = self.snapshots.load(as_of).await?;
        let components = self.scorers.score_all(&raw);
        Ok(self.calculator.compute(components, as_of))
    }
}
