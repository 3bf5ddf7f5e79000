use crate::entities::{
    DecisionRequest, GoldHedgeDecision, HoldPeriod, RiskLevel, RiskScore, RiskWarning, Side,
    SizingDecision, TrendClassification, TrendResult,
};
use crate::values::{EquityPct, Leverage, Symbol};
use serde::{Deserialize, Serialize};

/// Everything the order-execution collaborator needs for one leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegInstruction {
    pub symbol: Symbol,
    pub side: Side,
    pub equity_pct: EquityPct,
    pub leverage: Leverage,
    pub hold_days: u32,
}

impl LegInstruction {
    /// A leg with no allocation should not be sent to the broker
    pub fn is_tradeable(&self) -> bool {
        !self.equity_pct.is_zero() && !self.leverage.is_zero()
    }
}

/// Root aggregate returned by the engine
///
/// The sole externally visible output. Percentages and leverages are
/// fractions of available equity; converting them to share or contract
/// counts is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub request: DecisionRequest,
    pub risk_score: RiskScore,
    /// Present only when the level called for trend analysis
    pub trend: Option<TrendResult>,
    pub sizing: SizingDecision,
    pub hold_period: HoldPeriod,
    pub gold_hedge: GoldHedgeDecision,
    /// Non-fatal conditions raised along the way
    pub warnings: Vec<RiskWarning>,
}

impl Decision {
    pub fn level(&self) -> RiskLevel {
        self.risk_score.level
    }

    pub fn trend_classification(&self) -> Option<TrendClassification> {
        self.trend.as_ref().map(|t| t.classification)
    }

    /// Instruction for the given side of the event symbol
    pub fn leg(&self, side: Side) -> LegInstruction {
        LegInstruction {
            symbol: self.request.symbol.clone(),
            side,
            equity_pct: self.sizing.equity_pct(side),
            leverage: self.sizing.leverage(side),
            hold_days: self.hold_period.days(side),
        }
    }

    /// Instruction for the side the event asked for
    pub fn primary_leg(&self) -> LegInstruction {
        self.leg(self.request.side)
    }

    /// Gold leg, if a hedge was recommended
    pub fn hedge_leg(&self) -> Option<LegInstruction> {
        if !self.gold_hedge.recommended {
            return None;
        }
        Some(LegInstruction {
            symbol: self.gold_hedge.symbol.clone(),
            side: Side::Long,
            equity_pct: self.gold_hedge.allocation_pct,
            leverage: self.gold_hedge.leverage,
            hold_days: self.hold_period.gold_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EventType, HedgeReason, RiskComponentScores, SizingType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_decision(recommended: bool) -> Decision {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        Decision {
            request: DecisionRequest::for_event(as_of, "DECK", EventType::Addition),
            risk_score: RiskScore {
                value: dec!(0.45),
                level: RiskLevel::High,
                as_of,
                components: RiskComponentScores::default(),
            },
            trend: None,
            sizing: SizingDecision {
                long_equity_pct: dec!(0.08),
                short_equity_pct: dec!(0.50),
                long_leverage: dec!(1.5),
                short_leverage: dec!(4.0),
                long_multiplier: dec!(0.20),
                short_multiplier: dec!(1.25),
                sizing_type: SizingType::RiskBased,
            },
            hold_period: HoldPeriod {
                long_days: 4,
                short_days: 6,
                gold_days: if recommended { 20 } else { 0 },
            },
            gold_hedge: GoldHedgeDecision {
                recommended,
                allocation_pct: if recommended { dec!(0.42) } else { dec!(0) },
                reason: HedgeReason::HighSustained,
                symbol: "GC=F".to_string(),
                leverage: dec!(3.2),
            },
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_primary_leg_follows_request_side() {
        let decision = sample_decision(false);
        let leg = decision.primary_leg();
        assert_eq!(leg.side, Side::Long);
        assert_eq!(leg.symbol, "DECK");
        assert_eq!(leg.equity_pct, dec!(0.08));
        assert_eq!(leg.leverage, dec!(1.5));
        assert_eq!(leg.hold_days, 4);
        assert!(leg.is_tradeable());
    }

    #[test]
    fn test_hedge_leg() {
        assert!(sample_decision(false).hedge_leg().is_none());

        let leg = sample_decision(true).hedge_leg().unwrap();
        assert_eq!(leg.symbol, "GC=F");
        assert_eq!(leg.equity_pct, dec!(0.42));
        assert_eq!(leg.hold_days, 20);
    }

    #[test]
    fn test_decision_serializes() {
        let decision = sample_decision(true);
        let json = serde_json::to_string(&decision).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decision);
    }
}
