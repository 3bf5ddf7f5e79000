mod decision;
mod event;
mod gold_hedge;
mod hold_period;
mod risk_level;
mod risk_score;
mod side;
mod sizing;
mod trend;
mod warning;

pub use decision::{Decision, LegInstruction};
pub use event::{DecisionRequest, EventType};
pub use gold_hedge::{GoldHedgeDecision, HedgeReason};
pub use hold_period::HoldPeriod;
pub use risk_level::RiskLevel;
pub use risk_score::{RiskComponent, RiskComponentScores, RiskScore};
pub use side::Side;
pub use sizing::{SizingDecision, SizingType};
pub use trend::{HistoricalSample, TrendClassification, TrendMode, TrendResult};
pub use warning::RiskWarning;
