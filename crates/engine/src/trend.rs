//! Historical Trend Analysis
//!
//! Re-scores the market at prior reference dates and compares the results
//! with the current score.
//!
//! ```text
//!   strict:  s(2m) ── s(1m) ── s(14d) ── s(now)
//!            all strictly falling   → Improving
//!            all strictly rising    → Deteriorating
//!            anything else          → Same
//!            any sample missing     → Indeterminate
//!
//!   simple:  s(2m) ──────────────────── s(now)
//!            now < 2m               → Improving
//!            now > 2m               → Deteriorating
//!            equal                  → Same
//!            |diff| < tolerance     → within_tolerance
//! ```
//!
//! The tolerance band never hides a direction. It only lets the hedge
//! rules treat a small improvement as sustained risk.
//!
//! Reference dates whose data is unavailable become missing samples rather
//! than errors. A retrieval timeout still fails the analysis.

use crate::config::TrendConfig;
use crate::error::{DecisionError, Result};
use crate::source::ScoreSource;
use chrono::{Duration, Months};
use futures_util::future::join_all;
use log::{debug, warn};
use sentinel_core::{
    AsOf, HistoricalSample, RiskScore, RiskWarning, Score, TrendClassification, TrendMode,
    TrendResult,
};

/// Trend result plus any warnings raised while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendAnalysis {
    pub result: TrendResult,
    pub warnings: Vec<RiskWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoricalTrendAnalyzer {
    config: TrendConfig,
}

impl HistoricalTrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn mode(&self) -> TrendMode {
        self.config.mode
    }

    /// Reference dates for `as_of`, oldest first
    ///
    /// Calendar-month offsets clamp to the end of shorter months. A date
    /// that cannot be represented is reported as `None`.
    pub fn reference_dates(&self, as_of: AsOf) -> Vec<Option<AsOf>> {
        let months_back = |m: u32| as_of.checked_sub_months(Months::new(m));
        match self.config.mode {
            TrendMode::Strict => vec![
                months_back(self.config.far_months),
                months_back(self.config.mid_months),
                as_of.checked_sub_signed(Duration::days(i64::from(self.config.recent_days))),
            ],
            TrendMode::Simple => vec![months_back(self.config.far_months)],
        }
    }

    /// Score every reference date concurrently and classify the trend
    pub async fn analyze<S: ScoreSource + ?Sized>(
        &self,
        source: &S,
        current: &RiskScore,
    ) -> Result<TrendAnalysis> {
        let as_of = current.as_of;
        let dates = self.reference_dates(as_of);

        let outcomes = join_all(dates.iter().map(|date| async move {
            match date {
                Some(date) => Some(source.score_at(*date).await),
                None => None,
            }
        }))
        .await;

        let mut warnings = Vec::new();
        let mut history: Vec<(AsOf, Option<RiskScore>)> = Vec::with_capacity(dates.len());
        let mut missing = Vec::new();
        let mut missing_series = Vec::new();

        for (date, outcome) in dates.iter().zip(outcomes) {
            match (date, outcome) {
                (Some(date), Some(Ok(outcome))) => {
                    warnings.extend(outcome.warnings);
                    history.push((*date, Some(outcome.score)));
                }
                (Some(date), Some(Err(DecisionError::DataUnavailable { series, reason, .. }))) => {
                    debug!(
                        "[RISK] No historical score as of {}: {} ({})",
                        date, series, reason
                    );
                    missing.push(*date);
                    missing_series.push(series);
                    history.push((*date, None));
                }
                (Some(_), Some(Err(e))) => return Err(e),
                (None, _) | (Some(_), None) => {
                    warn!("[RISK] Reference date before {} is out of range", as_of);
                }
            }
        }

        let expected = dates.len();
        let samples: Vec<HistoricalSample> = history
            .iter()
            .filter_map(|(date, score)| {
                score.as_ref().map(|s| HistoricalSample {
                    as_of: *date,
                    score: s.clone(),
                })
            })
            .chain(std::iter::once(HistoricalSample {
                as_of,
                score: current.clone(),
            }))
            .collect();

        let complete = samples.len() == expected + 1;
        let classification = if !complete {
            missing_series.sort();
            missing_series.dedup();
            let series = if missing_series.is_empty() {
                "reference-date".to_string()
            } else {
                missing_series.join(", ")
            };
            let warning = RiskWarning::InsufficientHistory {
                as_of,
                missing,
                series,
            };
            warn!("[RISK] {}", warning);
            warnings.push(warning);
            TrendClassification::Indeterminate
        } else {
            let values: Vec<Score> = samples.iter().map(|s| s.score.value).collect();
            self.classify(&values)
        };

        debug!(
            "[RISK] Trend as of {}: {} ({:?}, {} samples)",
            as_of,
            classification,
            self.config.mode,
            samples.len()
        );

        let within_tolerance = complete && self.within_tolerance(&samples);

        Ok(TrendAnalysis {
            result: TrendResult {
                classification,
                mode: self.config.mode,
                samples,
                within_tolerance,
            },
            warnings,
        })
    }

    /// Classify a complete, chronological run of scores ending at the
    /// current one
    pub fn classify(&self, scores: &[Score]) -> TrendClassification {
        match self.config.mode {
            TrendMode::Strict => classify_strict(scores),
            TrendMode::Simple => match (scores.first(), scores.last()) {
                (Some(oldest), Some(current)) if scores.len() >= 2 => {
                    classify_simple(*oldest, *current)
                }
                _ => TrendClassification::Indeterminate,
            },
        }
    }

    fn within_tolerance(&self, samples: &[HistoricalSample]) -> bool {
        if self.config.mode != TrendMode::Simple {
            return false;
        }
        match (samples.first(), samples.last()) {
            (Some(oldest), Some(current)) if samples.len() >= 2 => within_band(
                oldest.score.value,
                current.score.value,
                self.config.same_tolerance,
            ),
            _ => false,
        }
    }
}

/// Strictly monotone over the whole run, oldest first
pub fn classify_strict(scores: &[Score]) -> TrendClassification {
    if scores.len() < 2 {
        return TrendClassification::Indeterminate;
    }
    if scores.windows(2).all(|w| w[1] < w[0]) {
        TrendClassification::Improving
    } else if scores.windows(2).all(|w| w[1] > w[0]) {
        TrendClassification::Deteriorating
    } else {
        TrendClassification::Same
    }
}

/// Direction of the current score against the oldest one
pub fn classify_simple(oldest: Score, current: Score) -> TrendClassification {
    if current < oldest {
        TrendClassification::Improving
    } else if current > oldest {
        TrendClassification::Deteriorating
    } else {
        TrendClassification::Same
    }
}

pub fn within_band(oldest: Score, current: Score, tolerance: Score) -> bool {
    (current - oldest).abs() < tolerance
}
