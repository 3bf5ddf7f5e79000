//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sentinel_core::{AsOf, Decision, DecisionRequest, RiskComponentScores, RiskWarning, Score};
use sentinel_engine::{
    DecisionError, EngineConfig, InMemoryMarketData, ScoreSource, SeriesCatalog,
};
use sentinel_ports::{DecisionObserver, Observation, SeriesId, TimeSeries};
use sentinel_scoring::{LevelBoundaries, RiskLevelClassifier, RiskScoreCalculator, ScoreOutcome};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> AsOf {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Default decision date used across the suites
pub fn as_of() -> AsOf {
    date(2024, 6, 28)
}

// ============================================================================
// Scripted scores
// ============================================================================

/// Score source answering from a fixed table of composite scores
///
/// Equal component scores make the composite equal to the scripted value.
/// Dates without a script are unavailable.
pub struct ScriptedSource {
    calculator: RiskScoreCalculator,
    scores: HashMap<AsOf, Score>,
    requested: Mutex<Vec<AsOf>>,
}

impl ScriptedSource {
    pub fn new(boundaries: LevelBoundaries, scores: &[(AsOf, Score)]) -> Self {
        Self {
            calculator: RiskScoreCalculator::new(RiskLevelClassifier::new(boundaries).unwrap()),
            scores: scores.iter().copied().collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Dates asked for so far, in request order
    pub fn requested(&self) -> Vec<AsOf> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreSource for ScriptedSource {
    async fn score_at(&self, as_of: AsOf) -> Result<ScoreOutcome, DecisionError> {
        self.requested.lock().unwrap().push(as_of);
        let value = self
            .scores
            .get(&as_of)
            .copied()
            .ok_or_else(|| DecisionError::DataUnavailable {
                as_of,
                series: "scripted".to_string(),
                reason: "no script for date".to_string(),
            })?;
        Ok(self
            .calculator
            .compute(RiskComponentScores::new(value, value, value, value), as_of))
    }
}

// ============================================================================
// Recording observer
// ============================================================================

#[derive(Default)]
pub struct RecordingObserver {
    pub decisions: Mutex<Vec<Decision>>,
    pub warnings: Mutex<Vec<RiskWarning>>,
    pub failures: Mutex<Vec<(DecisionRequest, String)>>,
    pub scores: Mutex<usize>,
}

impl DecisionObserver for RecordingObserver {
    fn on_score(&self, _score: &sentinel_core::RiskScore) {
        *self.scores.lock().unwrap() += 1;
    }

    fn on_warning(&self, warning: &RiskWarning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }

    fn on_decision(&self, decision: &Decision) {
        self.decisions.lock().unwrap().push(decision.clone());
    }

    fn on_failure(&self, request: &DecisionRequest, reason: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((request.clone(), reason.to_string()));
    }
}

// ============================================================================
// Synthetic market
// ============================================================================

pub const UNIVERSE: [&str; 8] = ["B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7"];

/// Engine config sized to the synthetic universe
pub fn market_config() -> EngineConfig {
    EngineConfig {
        series: SeriesCatalog {
            universe: UNIVERSE.iter().map(|t| t.to_string()).collect(),
            fundamentals_institutions: UNIVERSE.len(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Parameters of a synthetic market around [`as_of`]
#[derive(Debug, Clone)]
pub struct MarketFixture {
    /// Share of institution returns driven by the common factor
    pub coupling: f64,
    pub debt_to_equity: f64,
    pub interest_coverage: f64,
    pub vix: f64,
    pub inverted_curve: bool,
    /// Regulatory proxy level, stepping at the given offsets (days before
    /// `as_of`); the first step should be the oldest
    pub regulatory_steps: Vec<(i64, f64)>,
}

impl MarketFixture {
    /// Composite 0.42: MEDIUM, inclusive upper bound
    pub fn medium() -> Self {
        Self {
            coupling: 1.0,
            debt_to_equity: 2.5,
            interest_coverage: 4.0,
            vix: 22.0,
            inverted_curve: false,
            regulatory_steps: vec![(450, 0.3)],
        }
    }

    /// Composite rises 0.36 → 0.38 → 0.40 → 0.42 across the reference dates
    pub fn medium_deteriorating() -> Self {
        Self {
            regulatory_steps: vec![(450, 0.0), (40, 0.1), (20, 0.2), (7, 0.3)],
            ..Self::medium()
        }
    }

    /// Composite 0.73
    pub fn extreme() -> Self {
        Self {
            coupling: 1.0,
            debt_to_equity: 3.5,
            interest_coverage: 1.5,
            vix: 35.0,
            inverted_curve: true,
            regulatory_steps: vec![(450, 0.6)],
        }
    }

    /// Composite 0.27
    pub fn low() -> Self {
        Self {
            coupling: 1.0,
            debt_to_equity: 1.0,
            interest_coverage: 8.0,
            vix: 15.0,
            inverted_curve: false,
            regulatory_steps: vec![(450, 0.3)],
        }
    }

    fn regulatory_at(&self, day: AsOf) -> f64 {
        self.regulatory_steps
            .iter()
            .filter(|(offset, _)| as_of() - Duration::days(*offset) <= day)
            .map(|(_, level)| *level)
            .last()
            .unwrap_or(0.0)
    }

    /// Populate an adapter with 450 days of history and 30 days of
    /// post-`as_of` shock data
    pub fn build(&self) -> InMemoryMarketData {
        let md = InMemoryMarketData::new();
        let catalog = market_config().series;
        let start = as_of() - Duration::days(450);
        let days: Vec<AsOf> = (0..=480).map(|i| start + Duration::days(i)).collect();
        let future = |d: &AsOf| *d > as_of();

        for (k, ticker) in UNIVERSE.iter().enumerate() {
            let mut price = 50.0;
            let points = days
                .iter()
                .enumerate()
                .map(|(t, d)| {
                    let common = ((t * 7) % 11) as f64 / 11.0 - 0.5;
                    let own = (((t + 3 * k) * 13) % 17) as f64 / 17.0 - 0.5;
                    let shock = if future(d) { 0.5 } else { 1.0 };
                    price *= 1.0
                        + 0.02 * (self.coupling * common + (1.0 - self.coupling) * own) * shock;
                    Observation::new(*d, price)
                })
                .collect();
            md.insert(TimeSeries::new(catalog.price(ticker), points));

            md.insert(constant(
                catalog.debt_to_equity(ticker),
                &days,
                self.debt_to_equity,
                9.0,
            ));
            md.insert(constant(
                catalog.interest_coverage(ticker),
                &days,
                self.interest_coverage,
                0.5,
            ));
        }

        md.insert(constant(
            SeriesId::new(catalog.volatility_index.as_str()),
            &days,
            self.vix,
            80.0,
        ));
        md.insert(constant(
            SeriesId::new(catalog.ten_year_yield.as_str()),
            &days,
            4.0,
            1.0,
        ));
        md.insert(constant(
            SeriesId::new(catalog.three_month_yield.as_str()),
            &days,
            if self.inverted_curve { 4.5 } else { 3.0 },
            6.0,
        ));

        // Flat sector ETF: no volatility or drawdown contribution
        md.insert(constant(
            SeriesId::new(catalog.financial_sector.as_str()),
            &days,
            40.0,
            20.0,
        ));

        for proxy in &catalog.regulatory_proxies {
            let points = days
                .iter()
                .map(|d| {
                    let level = if future(d) {
                        1.0
                    } else {
                        self.regulatory_at(*d)
                    };
                    Observation::new(*d, level)
                })
                .collect();
            md.insert(TimeSeries::new(SeriesId::new(proxy.as_str()), points));
        }

        md
    }
}

/// Constant series up to `as_of`, then `shock` afterwards
fn constant(id: SeriesId, days: &[AsOf], value: f64, shock: f64) -> TimeSeries {
    TimeSeries::new(
        id,
        days.iter()
            .map(|d| Observation::new(*d, if *d > as_of() { shock } else { value }))
            .collect(),
    )
}

