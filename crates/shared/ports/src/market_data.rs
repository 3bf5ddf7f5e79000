//! Market Data Port - point-in-time indicator series
//!
//! The engine never talks to a data vendor directly. Adapters implement
//! [`MarketDataPort`] and must honour historical `as_of` dates: a query for
//! 2008-01-15 returns what was known on 2008-01-15, not today's data.

use crate::error::MarketDataResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use sentinel_core::AsOf;
use std::fmt;
use std::sync::Arc;

/// Identifier of an indicator series (e.g. `px:JPM`, `idx:^VIX`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single dated observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Dated observations for one series, ascending by date
///
/// Construction sorts, drops non-finite values and keeps the last value seen
/// for a duplicated date.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    series_id: SeriesId,
    points: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(series_id: SeriesId, mut points: Vec<Observation>) -> Self {
        points.retain(|p| p.value.is_finite());
        // Stable sort keeps insertion order for equal dates, so the last
        // duplicate wins after dedup below
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(points.len());
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }
        Self {
            series_id,
            points: deduped,
        }
    }

    pub fn empty(series_id: SeriesId) -> Self {
        Self {
            series_id,
            points: Vec::new(),
        }
    }

    pub fn series_id(&self) -> &SeriesId {
        &self.series_id
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Drop anything observed after `as_of` (no look-ahead)
    pub fn truncated_at(&self, as_of: AsOf) -> Self {
        let end = self.points.partition_point(|p| p.date <= as_of);
        Self {
            series_id: self.series_id.clone(),
            points: self.points[..end].to_vec(),
        }
    }

    /// Keep observations in `(as_of - lookback_days, as_of]`
    pub fn window(&self, as_of: AsOf, lookback_days: u32) -> Self {
        let start = as_of - chrono::Duration::days(i64::from(lookback_days));
        let points = self
            .points
            .iter()
            .filter(|p| p.date > start && p.date <= as_of)
            .copied()
            .collect();
        Self {
            series_id: self.series_id.clone(),
            points,
        }
    }

    /// Most recent observation on or before `as_of`
    pub fn latest_at_or_before(&self, as_of: AsOf) -> Option<Observation> {
        let end = self.points.partition_point(|p| p.date <= as_of);
        end.checked_sub(1).map(|i| self.points[i])
    }

    /// Simple returns `v[t] / v[t-1] - 1`, dated at `t`
    ///
    /// Pairs with a zero previous value are skipped.
    pub fn pct_returns(&self) -> Vec<Observation> {
        self.points
            .windows(2)
            .filter(|w| w[0].value != 0.0)
            .map(|w| Observation::new(w[1].date, w[1].value / w[0].value - 1.0))
            .collect()
    }
}

/// Port for point-in-time indicator retrieval
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Fetch `series` observed over `lookback_days` ending at `as_of`
    async fn fetch_indicator_series(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
    ) -> MarketDataResult<TimeSeries>;

    /// Get the adapter's name for logging
    fn name(&self) -> &str {
        "MarketData"
    }
}

#[async_trait]
impl<T: MarketDataPort + ?Sized> MarketDataPort for Arc<T> {
    async fn fetch_indicator_series(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
    ) -> MarketDataResult<TimeSeries> {
        (**self)
            .fetch_indicator_series(series, as_of, lookback_days)
            .await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
