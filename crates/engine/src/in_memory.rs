//! In-memory market-data adapter
//!
//! Thread-safe store of complete series using DashMap. Answers each query
//! with the requested lookback window ending at `as_of`, so the engine can be
//! exercised against deterministic snapshots without a data vendor.

use async_trait::async_trait;
use dashmap::DashMap;
use log::trace;
use sentinel_core::AsOf;
use sentinel_ports::{MarketDataError, MarketDataPort, MarketDataResult, SeriesId, TimeSeries};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory market-data adapter
pub struct InMemoryMarketData {
    series: Arc<DashMap<SeriesId, TimeSeries>>,
    /// Artificial latency per series, optionally for a single `as_of`
    delays: Arc<DashMap<(SeriesId, Option<AsOf>), Duration>>,
    /// Queries for dates before this answer `NotFound`
    available_from: Arc<DashMap<SeriesId, AsOf>>,
    /// When false, whole series are returned regardless of `as_of`
    point_in_time: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self {
            series: Arc::new(DashMap::new()),
            delays: Arc::new(DashMap::new()),
            available_from: Arc::new(DashMap::new()),
            point_in_time: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add or replace a series
    pub fn insert(&self, series: TimeSeries) {
        self.series.insert(series.series_id().clone(), series);
    }

    pub fn remove(&self, series: &SeriesId) {
        self.series.remove(series);
    }

    /// Delay every fetch of `series`
    pub fn set_delay(&self, series: impl Into<SeriesId>, delay: Duration) {
        self.delays.insert((series.into(), None), delay);
    }

    /// Apply [`set_delay`](Self::set_delay) to every stored series
    pub fn set_all_delays(&self, delay: Duration) {
        for entry in self.series.iter() {
            self.delays.insert((entry.key().clone(), None), delay);
        }
    }

    /// Delay fetches of `series` for one `as_of` only
    pub fn set_delay_at(&self, series: impl Into<SeriesId>, as_of: AsOf, delay: Duration) {
        self.delays.insert((series.into(), Some(as_of)), delay);
    }

    /// Pretend `series` has no history before `date`
    pub fn set_available_from(&self, series: impl Into<SeriesId>, date: AsOf) {
        self.available_from.insert(series.into(), date);
    }

    /// Apply [`set_available_from`](Self::set_available_from) to every stored series
    pub fn set_all_available_from(&self, date: AsOf) {
        for entry in self.series.iter() {
            self.available_from.insert(entry.key().clone(), date);
        }
    }

    /// Toggle point-in-time answers; off simulates an adapter that leaks
    /// observations after `as_of`
    pub fn set_point_in_time(&self, enabled: bool) {
        self.point_in_time.store(enabled, Ordering::SeqCst);
    }

    /// Number of fetches served, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn delay_for(&self, series: &SeriesId, as_of: AsOf) -> Option<Duration> {
        self.delays
            .get(&(series.clone(), Some(as_of)))
            .or_else(|| self.delays.get(&(series.clone(), None)))
            .map(|d| *d.value())
    }
}

impl Default for InMemoryMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryMarketData {
    fn clone(&self) -> Self {
        Self {
            series: Arc::clone(&self.series),
            delays: Arc::clone(&self.delays),
            available_from: Arc::clone(&self.available_from),
            point_in_time: Arc::clone(&self.point_in_time),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketData {
    async fn fetch_indicator_series(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
    ) -> MarketDataResult<TimeSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        trace!("[MD] fetch {} as of {} ({} days)", series, as_of, lookback_days);

        if let Some(delay) = self.delay_for(series, as_of) {
            tokio::time::sleep(delay).await;
        }

        let not_found = || MarketDataError::NotFound {
            series: series.to_string(),
            as_of,
        };

        if let Some(from) = self.available_from.get(series) {
            if as_of < *from.value() {
                return Err(not_found());
            }
        }

        let stored = self
            .series
            .get(series)
            .map(|s| s.value().clone())
            .ok_or_else(not_found)?;

        if !self.point_in_time.load(Ordering::SeqCst) {
            return Ok(stored);
        }

        let window = stored.window(as_of, lookback_days);
        if window.is_empty() {
            return Err(not_found());
        }
        Ok(window)
    }

    fn name(&self) -> &str {
        "InMemoryMarketData"
    }
}
