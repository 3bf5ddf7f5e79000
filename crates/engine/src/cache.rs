//! Read-through indicator cache
//!
//! The only state shared between decisions. Entries are keyed by
//! `(series, as_of, lookback)` and written insert-if-absent, so concurrent
//! misses for the same key settle on one value and readers never observe a
//! replaced entry.

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use sentinel_core::AsOf;
use sentinel_ports::{MarketDataPort, MarketDataResult, SeriesId, TimeSeries};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type CacheKey = (SeriesId, AsOf, u32);

/// Concurrent map of previously fetched series
#[derive(Debug, Default)]
pub struct IndicatorCache {
    entries: DashMap<CacheKey, TimeSeries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, series: &SeriesId, as_of: AsOf, lookback_days: u32) -> Option<TimeSeries> {
        let key = (series.clone(), as_of, lookback_days);
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `value` unless the key is already present; returns the stored value
    pub fn insert_if_absent(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
        value: TimeSeries,
    ) -> TimeSeries {
        self.entries
            .entry((series.clone(), as_of, lookback_days))
            .or_insert(value)
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Market-data adapter wrapped with the read-through cache
///
/// Only successful fetches are cached; errors always reach the caller and
/// the next request retries.
pub struct CachedMarketData<M> {
    inner: M,
    cache: Arc<IndicatorCache>,
}

impl<M: MarketDataPort> CachedMarketData<M> {
    pub fn new(inner: M, cache: Arc<IndicatorCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<IndicatorCache> {
        &self.cache
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: MarketDataPort> MarketDataPort for CachedMarketData<M> {
    async fn fetch_indicator_series(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
    ) -> MarketDataResult<TimeSeries> {
        if let Some(hit) = self.cache.get(series, as_of, lookback_days) {
            return Ok(hit);
        }
        let fetched = self
            .inner
            .fetch_indicator_series(series, as_of, lookback_days)
            .await?;
        debug!(
            "[RISK] Cached {} as of {} ({} days, {} points)",
            series,
            as_of,
            lookback_days,
            fetched.len()
        );
        Ok(self
            .cache
            .insert_if_absent(series, as_of, lookback_days, fetched))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
