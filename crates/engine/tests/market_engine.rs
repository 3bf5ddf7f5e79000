mod common;

use chrono::Duration;
use common::{MarketFixture, RecordingObserver, as_of, market_config};
use rust_decimal_macros::dec;
use sentinel_core::{
    DecisionRequest, EventType, HedgeReason, RiskLevel, RiskWarning, SizingType,
    TrendClassification,
};
use sentinel_engine::{DecisionEngine, DecisionError, EngineConfig, IndicatorCache};
use std::sync::Arc;
use std::time::Duration as StdDuration;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn addition() -> DecisionRequest {
    DecisionRequest::for_event(as_of(), "DECK", EventType::Addition)
}

#[tokio::test]
async fn test_stressed_market_is_extreme() {
    init();
    let engine = DecisionEngine::from_market_data(MarketFixture::extreme().build(), market_config())
        .unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.risk_score.value, dec!(0.73));
    assert_eq!(decision.level(), RiskLevel::Extreme);
    assert_eq!(decision.risk_score.components.correlation, dec!(0.7));
    assert_eq!(decision.risk_score.components.leverage, dec!(1.0));
    assert_eq!(decision.risk_score.components.liquidity, dec!(0.6));
    assert_eq!(decision.risk_score.components.regulatory, dec!(0.6));
    assert_eq!(
        decision.trend_classification(),
        Some(TrendClassification::Same)
    );
    assert_eq!(decision.sizing.long_equity_pct, dec!(0));
    assert!(decision.gold_hedge.recommended);
    assert_eq!(decision.gold_hedge.reason, HedgeReason::AutomaticThreshold);
    assert!(decision.warnings.is_empty());
}

#[tokio::test]
async fn test_low_market_skips_history() {
    init();
    let market = MarketFixture::low().build();
    let engine = DecisionEngine::from_market_data(market.clone(), market_config()).unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.risk_score.value, dec!(0.27));
    assert_eq!(decision.level(), RiskLevel::Low);
    assert!(decision.trend.is_none());
    assert_eq!(decision.sizing.long_equity_pct, dec!(0.44));
    assert!(!decision.gold_hedge.recommended);

    // One snapshot only: 8 prices, 16 fundamentals, 4 liquidity, 4 regulatory
    assert_eq!(market.calls(), 32);
}

#[tokio::test]
async fn test_rising_history_triggers_medium_hedge() {
    init();
    let engine = DecisionEngine::from_market_data(
        MarketFixture::medium_deteriorating().build(),
        market_config(),
    )
    .unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.risk_score.value, dec!(0.42));
    assert_eq!(decision.level(), RiskLevel::Medium);
    let trend = decision.trend.as_ref().unwrap();
    let history: Vec<_> = trend.samples.iter().map(|s| s.score.value).collect();
    assert_eq!(history, vec![dec!(0.36), dec!(0.38), dec!(0.40), dec!(0.42)]);
    assert_eq!(trend.classification, TrendClassification::Deteriorating);

    assert_eq!(decision.sizing.sizing_type, SizingType::RiskBased);
    assert_eq!(decision.sizing.long_equity_pct, dec!(0.14));
    assert!(decision.gold_hedge.recommended);
    assert_eq!(decision.gold_hedge.reason, HedgeReason::MediumDeteriorating);
    assert_eq!(decision.gold_hedge.allocation_pct, dec!(0.40));
    assert_eq!(decision.hold_period.gold_days, 20);
}

#[tokio::test]
async fn test_short_history_degrades_trend_only() {
    init();
    let market = MarketFixture::medium().build();
    market.set_all_available_from(as_of() - Duration::days(3));
    let observer = Arc::new(RecordingObserver::default());
    let engine = DecisionEngine::from_market_data(market, market_config())
        .unwrap()
        .with_observer(observer.clone());

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.level(), RiskLevel::Medium);
    assert_eq!(
        decision.trend_classification(),
        Some(TrendClassification::Indeterminate)
    );
    let missing = match &decision.warnings[..] {
        [RiskWarning::InsufficientHistory { missing, .. }] => missing.clone(),
        other => panic!("unexpected warnings {:?}", other),
    };
    assert_eq!(missing.len(), 3);
    assert_eq!(decision.sizing.sizing_type, SizingType::RiskBased);
    assert_eq!(decision.gold_hedge.reason, HedgeReason::TrendConditionsNotMet);
    assert_eq!(observer.warnings.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_volatility_index_fails() {
    init();
    let market = MarketFixture::medium().build();
    let config = market_config();
    market.remove(&config.series.volatility_index.as_str().into());
    let observer = Arc::new(RecordingObserver::default());
    let engine = DecisionEngine::from_market_data(market, config)
        .unwrap()
        .with_observer(observer.clone());

    let err = engine.decide(&addition()).await.unwrap_err();

    assert!(matches!(err, DecisionError::DataUnavailable { .. }));
    assert_eq!(err.series(), "idx:^VIX");
    assert_eq!(observer.failures.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_optional_series_may_be_missing() {
    init();
    let market = MarketFixture::medium().build();
    let config = market_config();
    market.remove(&config.series.ten_year_yield.as_str().into());
    market.remove(&config.series.three_month_yield.as_str().into());
    let engine = DecisionEngine::from_market_data(market, config).unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.risk_score.value, dec!(0.42));
}

#[tokio::test(start_paused = true)]
async fn test_current_timeout_fails_decision() {
    init();
    let market = MarketFixture::medium().build();
    let mut config = market_config();
    config.retrieval.timeout_ms = 100;
    market.set_delay("idx:^VIX", StdDuration::from_secs(60));
    let engine = DecisionEngine::from_market_data(market, config).unwrap();

    let err = engine.decide(&addition()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.series(), "idx:^VIX");
    assert_eq!(err.as_of(), as_of());
}

#[tokio::test(start_paused = true)]
async fn test_historical_timeout_fails_decision() {
    init();
    let market = MarketFixture::medium().build();
    let mut config = market_config();
    config.retrieval.timeout_ms = 100;
    let recent = as_of() - Duration::days(14);
    market.set_delay_at("idx:^VIX", recent, StdDuration::from_secs(60));
    let engine = DecisionEngine::from_market_data(market, config).unwrap();

    let err = engine.decide(&addition()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.as_of(), recent);
}

#[tokio::test(start_paused = true)]
async fn test_queued_fetches_do_not_time_out() {
    init();
    let market = MarketFixture::medium_deteriorating().build();
    let mut config = market_config();
    config.retrieval.timeout_ms = 1000;
    config.retrieval.max_concurrent_fetches = 4;
    // Every call answers well inside the deadline, but four snapshots
    // queue far longer than it for a permit
    market.set_all_delays(StdDuration::from_millis(200));
    let engine = DecisionEngine::from_market_data(market.clone(), config).unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    assert_eq!(decision.risk_score.value, dec!(0.42));
    assert_eq!(decision.gold_hedge.reason, HedgeReason::MediumDeteriorating);
    assert_eq!(market.calls(), 128);
}

#[tokio::test]
async fn test_future_observations_are_ignored() {
    init();
    let honest = MarketFixture::medium_deteriorating().build();
    let leaky = MarketFixture::medium_deteriorating().build();
    leaky.set_point_in_time(false);

    let expected = DecisionEngine::from_market_data(honest, market_config())
        .unwrap()
        .decide(&addition())
        .await
        .unwrap();
    let actual = DecisionEngine::from_market_data(leaky, market_config())
        .unwrap()
        .decide(&addition())
        .await
        .unwrap();

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_repeat_decision_served_from_cache() {
    init();
    let market = MarketFixture::medium_deteriorating().build();
    let engine = DecisionEngine::from_market_data(market.clone(), market_config()).unwrap();

    let first = engine.decide(&addition()).await.unwrap();
    let calls = market.calls();
    let second = engine.decide(&addition()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(market.calls(), calls);
    assert!(engine.cache().hits() > 0);
}

#[tokio::test]
async fn test_engines_share_a_cache() {
    init();
    let market = MarketFixture::extreme().build();
    let cache = Arc::new(IndicatorCache::new());
    let a = DecisionEngine::with_cache(market.clone(), market_config(), cache.clone()).unwrap();
    let b = DecisionEngine::with_cache(market.clone(), market_config(), cache.clone()).unwrap();

    let first = a.decide(&addition()).await.unwrap();
    let calls = market.calls();
    let second = b.decide(&addition()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(market.calls(), calls);
}

#[tokio::test]
async fn test_concurrent_decisions_agree() {
    init();
    let engine = Arc::new(
        DecisionEngine::from_market_data(MarketFixture::medium_deteriorating().build(), market_config())
            .unwrap(),
    );

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.decide(&addition()).await })
        })
        .collect();

    let mut decisions = Vec::new();
    for handle in handles {
        decisions.push(handle.await.unwrap().unwrap());
    }
    assert!(decisions.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(decisions[0].gold_hedge.reason, HedgeReason::MediumDeteriorating);
}

#[tokio::test]
async fn test_config_from_json_overrides_defaults() {
    init();
    let json = r#"{
        "series": {
            "universe": ["B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7"],
            "fundamentals_institutions": 8
        },
        "trend": { "mode": "simple" },
        "hedge": { "thresholds": { "mode": "single", "threshold": "0.475" } }
    }"#;
    let config = EngineConfig::from_json_str(json).unwrap();
    let engine =
        DecisionEngine::from_market_data(MarketFixture::medium_deteriorating().build(), config)
            .unwrap();

    let decision = engine.decide(&addition()).await.unwrap();

    let trend = decision.trend.as_ref().unwrap();
    assert_eq!(trend.samples.len(), 2);
    assert_eq!(trend.classification, TrendClassification::Deteriorating);
    assert!(!decision.gold_hedge.recommended);
    assert_eq!(decision.gold_hedge.reason, HedgeReason::BelowThreshold);
}
