//! Snapshot loading
//!
//! Fetches every series a scoring needs for one date and derives the raw
//! indicators from them.
//!
//! ```text
//!                        ┌──────────── Semaphore(max_concurrent_fetches) ───────────┐
//!  as_of ──► fan out ──► │ px:* (universe)  fund:*  idx:^VIX  rate:*  px:XLF  reg:* │
//!                        └───────────────── each under timeout ─────────────────────┘
//!                                              │ window(as_of, lookback)
//!                                              ▼
//!                                        RawIndicators
//! ```
//!
//! Required inputs (the volatility index, enough institutions for the
//! network, some fundamentals, some regulatory proxy) fail the snapshot with
//! `DataUnavailable`. Everything else is optional and contributes nothing
//! when absent. A fetch that exceeds the deadline fails with
//! `RetrievalTimeout` regardless of which series it was.

use crate::config::{IndicatorConfig, RetrievalConfig, SeriesCatalog};
use crate::error::{DecisionError, Result};
use futures_util::future::{join, join_all};
use log::{debug, warn};
use sentinel_core::AsOf;
use sentinel_ports::{MarketDataError, MarketDataPort, SeriesId, TimeSeries};
use sentinel_scoring::{
    InstitutionFundamentals, LiquidityInputs, RawIndicators, ScoringError,
    indicators::{correlation_network, leverage_profile, liquidity_profile, regulatory_profile},
};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Liquidity inputs as fetched; only the volatility index is required
struct LiquiditySeries {
    vix: Option<TimeSeries>,
    ten_year_yield: Option<TimeSeries>,
    three_month_yield: Option<TimeSeries>,
    financial_sector: Option<TimeSeries>,
}

/// Loads point-in-time indicator snapshots through a market-data port
pub struct SnapshotLoader<M> {
    market_data: M,
    catalog: SeriesCatalog,
    indicators: IndicatorConfig,
    retrieval: RetrievalConfig,
    permits: Arc<Semaphore>,
}

impl<M: MarketDataPort> SnapshotLoader<M> {
    pub fn new(
        market_data: M,
        catalog: SeriesCatalog,
        indicators: IndicatorConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(retrieval.max_concurrent_fetches));
        Self {
            market_data,
            catalog,
            indicators,
            retrieval,
            permits,
        }
    }

    pub fn market_data(&self) -> &M {
        &self.market_data
    }

    /// Fetch one series under the concurrency limit and the deadline
    ///
    /// The deadline bounds each adapter call, not the wait for a slot.
    /// `Ok(None)` when the adapter has nothing for the date. Observations
    /// after `as_of` are discarded.
    pub async fn fetch(
        &self,
        series: &SeriesId,
        as_of: AsOf,
        lookback_days: u32,
    ) -> Result<Option<TimeSeries>> {
        let timeout = DecisionError::RetrievalTimeout {
            as_of,
            series: series.to_string(),
        };

        // The semaphore is never closed. Queueing for a permit does not
        // count against the deadline.
        let _permit = self.permits.acquire().await.ok();
        let fetched = tokio::time::timeout(
            self.retrieval.timeout(),
            self.market_data
                .fetch_indicator_series(series, as_of, lookback_days),
        )
        .await;

        match fetched {
            Err(_elapsed) => {
                warn!(
                    "[RISK] {} as of {} exceeded {:?}",
                    series,
                    as_of,
                    self.retrieval.timeout()
                );
                Err(timeout)
            }
            Ok(Err(MarketDataError::Timeout { .. })) => Err(timeout),
            Ok(Err(e)) => {
                debug!("[RISK] {} unavailable via {}: {}", series, self.market_data.name(), e);
                Ok(None)
            }
            Ok(Ok(ts)) => {
                let ts = ts.window(as_of, lookback_days);
                Ok((!ts.is_empty()).then_some(ts))
            }
        }
    }

    /// Latest reading of `series` at or before `as_of`
    async fn latest(&self, series: SeriesId, as_of: AsOf) -> Result<Option<f64>> {
        let ts = self
            .fetch(&series, as_of, self.indicators.snapshot_lookback_days)
            .await?;
        Ok(ts.and_then(|ts| ts.latest_at_or_before(as_of)).map(|o| o.value))
    }

    /// Load every series for `as_of` and derive the raw indicators
    pub async fn load(&self, as_of: AsOf) -> Result<RawIndicators> {
        let (prices, (fundamentals, (liquidity, regulatory))) = join(
            self.load_prices(as_of),
            join(
                self.load_fundamentals(as_of),
                join(self.load_liquidity(as_of), self.load_regulatory(as_of)),
            ),
        )
        .await;

        // Retrieval failures take precedence over missing data
        let (prices, fundamentals, liquidity, regulatory) =
            (prices?, fundamentals?, liquidity?, regulatory?);

        let unavailable = |series: &str, e: ScoringError| DecisionError::DataUnavailable {
            as_of,
            series: series.to_string(),
            reason: e.to_string(),
        };

        let correlation = correlation_network(&prices, &self.indicators.network)
            .map_err(|e| unavailable("correlation-network", e))?;
        let leverage = leverage_profile(&fundamentals, &self.indicators.leverage)
            .map_err(|e| unavailable("leverage", e))?;

        let vix_id = &self.catalog.volatility_index;
        let vix = liquidity.vix.ok_or_else(|| DecisionError::DataUnavailable {
            as_of,
            series: vix_id.clone(),
            reason: "volatility index not available".to_string(),
        })?;
        let liquidity = liquidity_profile(LiquidityInputs {
            vix: &vix,
            ten_year_yield: liquidity.ten_year_yield.as_ref(),
            three_month_yield: liquidity.three_month_yield.as_ref(),
            financial_sector: liquidity.financial_sector.as_ref(),
        })
        .map_err(|e| unavailable(vix_id, e))?;

        let regulatory =
            regulatory_profile(&regulatory).map_err(|e| unavailable("regulatory", e))?;

        Ok(RawIndicators {
            correlation,
            leverage,
            liquidity,
            regulatory,
        })
    }

    async fn load_prices(&self, as_of: AsOf) -> Result<Vec<TimeSeries>> {
        let lookback = self.indicators.correlation_lookback_days;
        let fetches = self
            .catalog
            .universe
            .iter()
            .map(|ticker| {
                let id = self.catalog.price(ticker);
                async move { self.fetch(&id, as_of, lookback).await }
            });
        let prices: Vec<TimeSeries> = join_all(fetches)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();
        debug!(
            "[RISK] {} of {} institutions priced as of {}",
            prices.len(),
            self.catalog.universe.len(),
            as_of
        );
        Ok(prices)
    }

    async fn load_fundamentals(&self, as_of: AsOf) -> Result<Vec<InstitutionFundamentals>> {
        let fetches = self.catalog.fundamentals_universe().iter().map(|ticker| async move {
            let (debt_to_equity, interest_coverage) = join(
                self.latest(self.catalog.debt_to_equity(ticker), as_of),
                self.latest(self.catalog.interest_coverage(ticker), as_of),
            )
            .await;
            Ok::<_, DecisionError>(InstitutionFundamentals {
                symbol: ticker.clone(),
                debt_to_equity: debt_to_equity?,
                interest_coverage: interest_coverage?,
            })
        });
        join_all(fetches).await.into_iter().collect()
    }

    async fn load_liquidity(&self, as_of: AsOf) -> Result<LiquiditySeries> {
        let lookback = self.indicators.liquidity_lookback_days;
        let id = |s: &String| SeriesId::new(s.as_str());
        let (vix_id, ten_id, three_id, sector_id) = (
            id(&self.catalog.volatility_index),
            id(&self.catalog.ten_year_yield),
            id(&self.catalog.three_month_yield),
            id(&self.catalog.financial_sector),
        );

        let (vix, (ten, (three, sector))) = join(
            self.fetch(&vix_id, as_of, lookback),
            join(
                self.fetch(&ten_id, as_of, lookback),
                join(
                    self.fetch(&three_id, as_of, lookback),
                    self.fetch(&sector_id, as_of, lookback),
                ),
            ),
        )
        .await;

        Ok(LiquiditySeries {
            vix: vix?,
            ten_year_yield: ten?,
            three_month_yield: three?,
            financial_sector: sector?,
        })
    }

    async fn load_regulatory(&self, as_of: AsOf) -> Result<Vec<(String, Option<f64>)>> {
        let fetches = self.catalog.regulatory_proxies.iter().map(|proxy| async move {
            let value = self.latest(SeriesId::new(proxy.as_str()), as_of).await?;
            Ok::<_, DecisionError>((proxy.clone(), value))
        });
        join_all(fetches).await.into_iter().collect()
    }
}
