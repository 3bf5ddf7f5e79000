//! Sentinel Core Domain
//!
//! Pure domain types for the Sentinel systemic-risk decision engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Risk scoring
    RiskComponent,
    RiskComponentScores,
    RiskLevel,
    RiskScore,
    RiskWarning,
    // Trend analysis
    HistoricalSample,
    TrendClassification,
    TrendMode,
    TrendResult,
    // Decision outputs
    Decision,
    GoldHedgeDecision,
    HedgeReason,
    HoldPeriod,
    LegInstruction,
    SizingDecision,
    SizingType,
    // Inputs
    DecisionRequest,
    EventType,
    Side,
};
pub use values::{AsOf, EquityPct, Leverage, Score, Symbol};
