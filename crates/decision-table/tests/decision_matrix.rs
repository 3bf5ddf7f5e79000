//! Integration test: the three tables wired together the way the engine
//! uses them, walked over every (score, level, trend) cell.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sentinel_core::{HedgeReason, RiskLevel, SizingType, TrendClassification};
use sentinel_decision::{
    GoldHedgeEngine, HedgeConfig, HedgeThresholds, HoldPeriodEngine, PositionSizingEngine,
};

const TRENDS: [Option<TrendClassification>; 5] = [
    None,
    Some(TrendClassification::Improving),
    Some(TrendClassification::Deteriorating),
    Some(TrendClassification::Same),
    Some(TrendClassification::Indeterminate),
];

/// Representative scores inside each default band
fn scores_for(level: RiskLevel) -> Vec<Decimal> {
    match level {
        RiskLevel::Minimal => vec![dec!(0), dec!(0.1), dec!(0.20)],
        RiskLevel::Low => vec![dec!(0.21), dec!(0.3), dec!(0.37)],
        RiskLevel::Medium => vec![dec!(0.38), dec!(0.41), dec!(0.42)],
        RiskLevel::High => vec![dec!(0.43), dec!(0.47), dec!(0.48), dec!(0.50)],
        RiskLevel::Extreme => vec![dec!(0.51), dec!(0.75), dec!(1)],
    }
}

#[test]
fn test_gold_leg_follows_hedge() {
    let sizing = PositionSizingEngine::default();
    let hold = HoldPeriodEngine::default();
    let hedge = GoldHedgeEngine::default();

    for level in RiskLevel::ALL {
        for trend in TRENDS {
            for score in scores_for(level) {
                let h = hedge.decide(score, level, trend);
                let period = hold.hold_period(level, h.recommended);
                let s = sizing.size(level, trend);

                assert_eq!(period.gold_days > 0, h.recommended);
                assert_eq!(h.allocation_pct.is_zero(), !h.recommended);
                if !level.requires_trend() {
                    assert!(!h.recommended, "{} must not hedge", level);
                    assert_eq!(s.sizing_type, SizingType::RiskBased);
                }
                if level == RiskLevel::Extreme {
                    assert!(h.recommended);
                    assert!(s.long_equity_pct.is_zero());
                    assert!(s.long_leverage.is_zero());
                    assert_eq!(period.long_days, 0);
                }
            }
        }
    }
}

#[test]
fn test_medium_deteriorating_in_band() {
    let hedge = GoldHedgeEngine::default();
    let d = hedge.decide(
        dec!(0.42),
        RiskLevel::Medium,
        Some(TrendClassification::Deteriorating),
    );
    assert!(d.recommended);
    assert_eq!(d.reason, HedgeReason::MediumDeteriorating);
    assert_eq!(d.allocation_pct, dec!(0.40));
}

#[test]
fn test_medium_score_above_auto_is_automatic() {
    // With wider level bands a MEDIUM score can reach the automatic
    // threshold; the automatic rule is checked before the trend band
    let hedge = GoldHedgeEngine::default();
    let d = hedge.decide(
        dec!(0.50),
        RiskLevel::Medium,
        Some(TrendClassification::Deteriorating),
    );
    assert!(d.recommended);
    assert_eq!(d.reason, HedgeReason::AutomaticThreshold);
    assert_eq!(d.allocation_pct, dec!(0.40));
}

#[test]
fn test_high_improving_trend_sizes_up_without_hedge() {
    let sizing = PositionSizingEngine::default();
    let hedge = GoldHedgeEngine::default();
    let trend = Some(TrendClassification::Improving);

    let s = sizing.size(RiskLevel::High, trend);
    assert_eq!(s.sizing_type, SizingType::TrendBased);
    assert_eq!(s.long_equity_pct, dec!(0.50));
    assert_eq!(s.short_equity_pct, dec!(0.20));

    let h = hedge.decide(dec!(0.45), RiskLevel::High, trend);
    assert!(!h.recommended);
    assert_eq!(h.reason, HedgeReason::TrendConditionsNotMet);
}

#[test]
fn test_hedge_config_from_json() {
    let json = r#"{
        "thresholds": { "mode": "single", "threshold": "0.475" },
        "allocations": { "medium": "0.40", "high": "0.42", "extreme": "0.50" },
        "symbol": "GLD",
        "leverage": "1.0"
    }"#;
    let config: HedgeConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.thresholds, HedgeThresholds::single());
    let engine = GoldHedgeEngine::new(config).unwrap();
    let d = engine.decide(dec!(0.49), RiskLevel::High, None);
    assert!(d.recommended);
    assert_eq!(d.symbol, "GLD");
}
