//! Sentinel Decision Tables
//!
//! Deterministic mappings from a classified risk score (and, where the
//! level calls for it, a trend) to the three outputs of a decision:
//!
//! ```text
//!                    ┌──────────────────────┐
//!  (level, trend) ──►│ PositionSizingEngine │──► SizingDecision
//!                    └──────────────────────┘
//!                    ┌──────────────────────┐
//!  (level, hedged) ─►│   HoldPeriodEngine   │──► HoldPeriod
//!                    └──────────────────────┘
//!                    ┌──────────────────────┐
//!  (score, level, ──►│   GoldHedgeEngine    │──► GoldHedgeDecision
//!   trend)           └──────────────────────┘
//! ```
//!
//! Every table is plain serde configuration validated at construction.

pub mod error;
pub mod gold_hedge;
pub mod hold_period;
pub mod sizing;

pub use error::{Result, TableError};
pub use gold_hedge::{GoldHedgeEngine, HedgeAllocations, HedgeConfig, HedgeThresholds};
pub use hold_period::{HoldPeriodEngine, HoldPeriodTable, HoldRow};
pub use sizing::{PositionSizingEngine, SizingRow, SizingTable};
