//! Raw Indicator Derivation
//!
//! Turns point-in-time series into the raw indicators the scorers consume:
//!
//! - **Correlation network**: pairwise return correlations across the
//!   institution universe and the topology of the graph they induce
//! - **Leverage**: balance-sheet ratios aggregated across institutions
//! - **Liquidity**: volatility index, yield-curve shape, sector stress
//! - **Regulatory**: proxy indicators already expressed in [0, 1]
//!
//! Everything here is pure. Callers are responsible for trimming series to
//! the decision date before handing them over.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use sentinel_ports::{Observation, TimeSeries};

/// Trading days per year used to annualize volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Parameters for the correlation-network analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    /// Minimum return observations for an institution to be included
    pub min_observations: usize,
    /// Minimum usable institutions for the network to be meaningful
    pub min_institutions: usize,
    /// |correlation| above which two institutions are linked
    pub edge_threshold: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            min_observations: 50,
            min_institutions: 5,
            edge_threshold: 0.7,
        }
    }
}

/// Correlation-network indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationIndicators {
    /// Institutions that passed the observation filter
    pub institutions: usize,
    pub avg_correlation: f64,
    pub max_correlation: f64,
    pub correlation_std: f64,
    pub network_density: f64,
    pub network_centralization: f64,
    pub high_correlation_pairs: usize,
}

/// Build the correlation network from institution price series
pub fn correlation_network(
    prices: &[TimeSeries],
    params: &NetworkParams,
) -> Result<CorrelationIndicators> {
    let returns: Vec<Vec<Observation>> = prices
        .iter()
        .map(TimeSeries::pct_returns)
        .filter(|r| r.len() >= params.min_observations)
        .collect();

    let n = returns.len();
    if n < params.min_institutions.max(2) {
        return Err(ScoringError::InsufficientData {
            series: "correlation-network".to_string(),
            required: params.min_institutions.max(2),
            actual: n,
        });
    }

    let mut correlations = Vec::with_capacity(n * (n - 1) / 2);
    let mut degree = vec![0usize; n];
    let mut edges = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            let Some(rho) = pairwise_correlation(&returns[i], &returns[j]) else {
                continue;
            };
            correlations.push(rho);
            if rho.abs() > params.edge_threshold {
                edges += 1;
                degree[i] += 1;
                degree[j] += 1;
            }
        }
    }

    if correlations.is_empty() {
        return Err(ScoringError::InsufficientData {
            series: "correlation-network".to_string(),
            required: 1,
            actual: 0,
        });
    }

    let possible = (n * (n - 1) / 2) as f64;
    let max_degree = degree.iter().copied().max().unwrap_or(0);
    let centralization = if n > 2 {
        let spread: usize = degree.iter().map(|d| max_degree - d).sum();
        spread as f64 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };

    Ok(CorrelationIndicators {
        institutions: n,
        avg_correlation: mean(&correlations),
        max_correlation: correlations
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max),
        correlation_std: population_std(&correlations),
        network_density: edges as f64 / possible,
        network_centralization: centralization,
        high_correlation_pairs: edges,
    })
}

/// Pearson correlation over the dates both series share
///
/// `None` when fewer than three dates overlap or either side is flat.
pub fn pairwise_correlation(a: &[Observation], b: &[Observation]) -> Option<f64> {
    let (xs, ys) = align(a, b);
    if xs.len() < 3 {
        return None;
    }
    let mx = mean(&xs);
    let my = mean(&ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx <= 0.0 || vy <= 0.0 {
        return None;
    }
    Some((cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0))
}

/// Merge-join two date-sorted observation lists on date
fn align(a: &[Observation], b: &[Observation]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(a[i].value);
                ys.push(b[j].value);
                i += 1;
                j += 1;
            }
        }
    }
    (xs, ys)
}

/// Balance-sheet ratios for one institution at the decision date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionFundamentals {
    pub symbol: String,
    pub debt_to_equity: Option<f64>,
    pub interest_coverage: Option<f64>,
}

/// Cut-offs for the leverage threshold counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeverageParams {
    /// Debt-to-equity above which an institution counts as highly levered
    pub high_leverage_debt_to_equity: f64,
    /// Interest coverage below which an institution counts as thinly covered
    pub low_interest_coverage: f64,
}

impl Default for LeverageParams {
    fn default() -> Self {
        Self {
            high_leverage_debt_to_equity: 2.0,
            low_interest_coverage: 2.5,
        }
    }
}

/// Aggregate leverage indicators
///
/// Averages are `None` when no institution reported the ratio, so a missing
/// ratio never reads as an alarming zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageIndicators {
    pub reporting_institutions: usize,
    pub avg_debt_to_equity: Option<f64>,
    pub max_debt_to_equity: Option<f64>,
    pub avg_interest_coverage: Option<f64>,
    pub min_interest_coverage: Option<f64>,
    pub high_leverage_count: usize,
    pub low_coverage_count: usize,
}

pub fn leverage_profile(
    institutions: &[InstitutionFundamentals],
    params: &LeverageParams,
) -> Result<LeverageIndicators> {
    let usable = |v: &Option<f64>| v.filter(|x| x.is_finite() && *x != 0.0);
    let debt_to_equity: Vec<f64> = institutions
        .iter()
        .filter_map(|i| usable(&i.debt_to_equity))
        .collect();
    let coverage: Vec<f64> = institutions
        .iter()
        .filter_map(|i| usable(&i.interest_coverage))
        .collect();

    let reporting = institutions
        .iter()
        .filter(|i| usable(&i.debt_to_equity).is_some() || usable(&i.interest_coverage).is_some())
        .count();
    if reporting == 0 {
        return Err(ScoringError::InsufficientData {
            series: "leverage".to_string(),
            required: 1,
            actual: 0,
        });
    }

    let non_empty = |v: &[f64]| (!v.is_empty()).then_some(());
    Ok(LeverageIndicators {
        reporting_institutions: reporting,
        avg_debt_to_equity: non_empty(&debt_to_equity).map(|_| mean(&debt_to_equity)),
        max_debt_to_equity: debt_to_equity.iter().copied().reduce(f64::max),
        avg_interest_coverage: non_empty(&coverage).map(|_| mean(&coverage)),
        min_interest_coverage: coverage.iter().copied().reduce(f64::min),
        high_leverage_count: debt_to_equity
            .iter()
            .filter(|&&x| x > params.high_leverage_debt_to_equity)
            .count(),
        low_coverage_count: coverage
            .iter()
            .filter(|&&x| x < params.low_interest_coverage)
            .count(),
    })
}

/// Series feeding the liquidity indicators
#[derive(Debug, Clone, Copy)]
pub struct LiquidityInputs<'a> {
    /// Volatility index level (required)
    pub vix: &'a TimeSeries,
    pub ten_year_yield: Option<&'a TimeSeries>,
    pub three_month_yield: Option<&'a TimeSeries>,
    /// Financial-sector benchmark price
    pub financial_sector: Option<&'a TimeSeries>,
}

/// Market-wide liquidity indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityIndicators {
    pub vix_mean: f64,
    pub vix_max: f64,
    pub vix_std: f64,
    pub yield_spread_mean: Option<f64>,
    pub yield_spread_min: Option<f64>,
    pub yield_curve_inverted: bool,
    pub financial_volatility: Option<f64>,
    pub financial_max_drawdown: Option<f64>,
}

pub fn liquidity_profile(inputs: LiquidityInputs<'_>) -> Result<LiquidityIndicators> {
    let vix: Vec<f64> = inputs.vix.values().collect();
    if vix.is_empty() {
        return Err(ScoringError::InsufficientData {
            series: inputs.vix.series_id().to_string(),
            required: 1,
            actual: 0,
        });
    }

    let spread: Vec<f64> = match (inputs.ten_year_yield, inputs.three_month_yield) {
        (Some(long), Some(short)) => {
            let (l, s) = align(long.points(), short.points());
            l.iter().zip(&s).map(|(l, s)| l - s).collect()
        }
        _ => Vec::new(),
    };
    let spread_min = spread.iter().copied().reduce(f64::min);

    let (financial_volatility, financial_max_drawdown) = match inputs.financial_sector {
        Some(sector) if sector.len() >= 2 => {
            let returns: Vec<f64> = sector.pct_returns().iter().map(|o| o.value).collect();
            let vol = (returns.len() >= 2)
                .then(|| sample_std(&returns) * TRADING_DAYS_PER_YEAR.sqrt());
            let prices: Vec<f64> = sector.values().collect();
            (vol, Some(max_drawdown(&prices)))
        }
        _ => (None, None),
    };

    Ok(LiquidityIndicators {
        vix_mean: mean(&vix),
        vix_max: vix.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        vix_std: if vix.len() >= 2 { sample_std(&vix) } else { 0.0 },
        yield_spread_mean: (!spread.is_empty()).then(|| mean(&spread)),
        yield_spread_min: spread_min,
        yield_curve_inverted: spread_min.is_some_and(|m| m < 0.0),
        financial_volatility,
        financial_max_drawdown,
    })
}

/// Regulatory proxy indicators, each in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryIndicators {
    pub values: Vec<(String, f64)>,
}

impl RegulatoryIndicators {
    pub fn mean(&self) -> f64 {
        let values: Vec<f64> = self.values.iter().map(|(_, v)| *v).collect();
        mean(&values)
    }
}

/// Collect the latest available proxy readings
pub fn regulatory_profile(proxies: &[(String, Option<f64>)]) -> Result<RegulatoryIndicators> {
    let values: Vec<(String, f64)> = proxies
        .iter()
        .filter_map(|(name, v)| v.filter(|x| x.is_finite()).map(|x| (name.clone(), x)))
        .collect();
    if values.is_empty() {
        return Err(ScoringError::InsufficientData {
            series: "regulatory".to_string(),
            required: 1,
            actual: 0,
        });
    }
    Ok(RegulatoryIndicators { values })
}

/// Raw indicators for one date, one block per component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIndicators {
    pub correlation: CorrelationIndicators,
    pub leverage: LeverageIndicators,
    pub liquidity: LiquidityIndicators,
    pub regulatory: RegulatoryIndicators,
}

/// Worst peak-to-trough decline, as a non-positive fraction
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &p in prices {
        peak = peak.max(p);
        if peak > 0.0 {
            worst = worst.min((p - peak) / peak);
        }
    }
    worst
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sentinel_ports::SeriesId;

    fn date(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn series(id: &str, values: &[f64]) -> TimeSeries {
        TimeSeries::new(
            SeriesId::new(id),
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Observation::new(date(i as i64), v))
                .collect(),
        )
    }

    /// Prices driven by a shared factor plus an idiosyncratic wobble
    fn factor_prices(id: &str, len: usize, factor_weight: f64, phase: usize) -> TimeSeries {
        let mut price = 100.0;
        let values: Vec<f64> = (0..len)
            .map(|t| {
                let common = ((t * 7) % 11) as f64 / 11.0 - 0.5;
                let own = (((t + phase) * 13) % 17) as f64 / 17.0 - 0.5;
                price *= 1.0 + 0.01 * (factor_weight * common + (1.0 - factor_weight) * own);
                price
            })
            .collect();
        series(id, &values)
    }

    #[test]
    fn test_pairwise_correlation_perfect() {
        let a = series("a", &[1.0, 2.0, 4.0, 3.0, 5.0]).pct_returns();
        let b = series("b", &[2.0, 4.0, 8.0, 6.0, 10.0]).pct_returns();
        let rho = pairwise_correlation(&a, &b).unwrap();
        assert!((rho - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pairwise_correlation_flat_is_none() {
        let a = series("a", &[1.0, 1.0, 1.0, 1.0]).pct_returns();
        let b = series("b", &[1.0, 2.0, 1.0, 2.0]).pct_returns();
        assert_eq!(pairwise_correlation(&a, &b), None);
    }

    #[test]
    fn test_network_requires_enough_institutions() {
        let prices: Vec<_> = (0..4)
            .map(|i| factor_prices(&format!("px:{}", i), 80, 0.9, i))
            .collect();
        let err = correlation_network(&prices, &NetworkParams::default()).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InsufficientData {
                series: "correlation-network".to_string(),
                required: 5,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_network_drops_short_histories() {
        let mut prices: Vec<_> = (0..5)
            .map(|i| factor_prices(&format!("px:{}", i), 80, 0.9, i))
            .collect();
        prices.push(factor_prices("px:short", 20, 0.9, 3));
        let ind = correlation_network(&prices, &NetworkParams::default()).unwrap();
        assert_eq!(ind.institutions, 5);
    }

    #[test]
    fn test_identical_institutions_form_complete_network() {
        let prices: Vec<_> = (0..6)
            .map(|i| factor_prices(&format!("px:{}", i), 80, 1.0, 0))
            .collect();
        let ind = correlation_network(&prices, &NetworkParams::default()).unwrap();
        assert!((ind.avg_correlation - 1.0).abs() < 1e-9);
        assert!((ind.network_density - 1.0).abs() < 1e-12);
        assert_eq!(ind.high_correlation_pairs, 15);
        // Every node has the same degree
        assert_eq!(ind.network_centralization, 0.0);
    }

    #[test]
    fn test_star_network_centralization() {
        // Degrees of a 5-node star: hub 4, leaves 1 -> (3*4)/(4*3) = 1.0
        let n = 5usize;
        let degree = [4usize, 1, 1, 1, 1];
        let max = 4usize;
        let spread: usize = degree.iter().map(|d| max - d).sum();
        assert_eq!(spread as f64 / ((n - 1) * (n - 2)) as f64, 1.0);
    }

    #[test]
    fn test_leverage_profile() {
        let institutions = vec![
            InstitutionFundamentals {
                symbol: "JPM".into(),
                debt_to_equity: Some(3.5),
                interest_coverage: Some(1.5),
            },
            InstitutionFundamentals {
                symbol: "BAC".into(),
                debt_to_equity: Some(1.5),
                interest_coverage: None,
            },
            InstitutionFundamentals {
                symbol: "C".into(),
                debt_to_equity: None,
                interest_coverage: None,
            },
        ];
        let ind = leverage_profile(&institutions, &LeverageParams::default()).unwrap();
        assert_eq!(ind.reporting_institutions, 2);
        assert_eq!(ind.avg_debt_to_equity, Some(2.5));
        assert_eq!(ind.max_debt_to_equity, Some(3.5));
        assert_eq!(ind.avg_interest_coverage, Some(1.5));
        assert_eq!(ind.high_leverage_count, 1);
        assert_eq!(ind.low_coverage_count, 1);
    }

    #[test]
    fn test_leverage_profile_without_data() {
        let institutions = vec![InstitutionFundamentals {
            symbol: "GS".into(),
            debt_to_equity: None,
            interest_coverage: Some(0.0),
        }];
        assert!(leverage_profile(&institutions, &LeverageParams::default()).is_err());
    }

    #[test]
    fn test_liquidity_profile() {
        let vix = series("idx:^VIX", &[18.0, 22.0, 26.0]);
        let ten = series("rate:^TNX", &[4.0, 4.1, 4.2]);
        let three = series("rate:^IRX", &[4.5, 4.0, 4.1]);
        let xlf = series("px:XLF", &[100.0, 90.0, 95.0, 80.0]);
        let ind = liquidity_profile(LiquidityInputs {
            vix: &vix,
            ten_year_yield: Some(&ten),
            three_month_yield: Some(&three),
            financial_sector: Some(&xlf),
        })
        .unwrap();
        assert!((ind.vix_mean - 22.0).abs() < 1e-12);
        assert_eq!(ind.vix_max, 26.0);
        assert!(ind.yield_curve_inverted);
        assert!((ind.yield_spread_min.unwrap() + 0.5).abs() < 1e-12);
        assert!((ind.financial_max_drawdown.unwrap() + 0.2).abs() < 1e-12);
        assert!(ind.financial_volatility.unwrap() > 0.0);
    }

    #[test]
    fn test_liquidity_optional_inputs() {
        let vix = series("idx:^VIX", &[15.0]);
        let ind = liquidity_profile(LiquidityInputs {
            vix: &vix,
            ten_year_yield: None,
            three_month_yield: None,
            financial_sector: None,
        })
        .unwrap();
        assert!(!ind.yield_curve_inverted);
        assert_eq!(ind.yield_spread_mean, None);
        assert_eq!(ind.financial_volatility, None);
        assert_eq!(ind.vix_std, 0.0);
    }

    #[test]
    fn test_liquidity_requires_vix() {
        let vix = TimeSeries::empty(SeriesId::new("idx:^VIX"));
        let err = liquidity_profile(LiquidityInputs {
            vix: &vix,
            ten_year_yield: None,
            three_month_yield: None,
            financial_sector: None,
        })
        .unwrap_err();
        assert!(matches!(err, ScoringError::InsufficientData { ref series, .. } if series == "idx:^VIX"));
    }

    #[test]
    fn test_regulatory_profile() {
        let proxies = vec![
            ("uncertainty".to_string(), Some(0.5)),
            ("capital".to_string(), Some(0.3)),
            ("political".to_string(), None),
            ("changes".to_string(), Some(0.1)),
        ];
        let ind = regulatory_profile(&proxies).unwrap();
        assert_eq!(ind.values.len(), 3);
        assert!((ind.mean() - 0.3).abs() < 1e-12);

        assert!(regulatory_profile(&[("x".to_string(), None)]).is_err());
    }

    #[test]
    fn test_max_drawdown() {
        assert_eq!(max_drawdown(&[100.0, 110.0, 120.0]), 0.0);
        assert!((max_drawdown(&[100.0, 50.0, 200.0, 150.0]) + 0.5).abs() < 1e-12);
    }
}
