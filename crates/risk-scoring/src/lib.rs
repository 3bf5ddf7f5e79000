//! Sentinel Risk Scoring
//!
//! Everything between raw market series and a classified [`RiskScore`]:
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ TimeSeries   │──►│ indicators │──►│   scorers    │──►│  calculator  │──► RiskScore
//! │ (per series) │   │ (f64 stats)│   │ (step tables)│   │ + classifier │
//! └──────────────┘   └────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! All functions are pure; data retrieval lives in the engine crate.
//!
//! [`RiskScore`]: sentinel_core::RiskScore

pub mod calculator;
pub mod calibration;
pub mod classifier;
pub mod error;
pub mod indicators;
pub mod scorers;

pub use calculator::{RiskScoreCalculator, ScoreOutcome};
pub use calibration::{
    CalibrationConfig, Comparison, CorrelationCalibration, LeverageCalibration,
    LiquidityCalibration, Step, StepTable,
};
pub use classifier::{LevelBoundaries, RiskLevelClassifier};
pub use error::{Result, ScoringError};
pub use indicators::{
    CorrelationIndicators, InstitutionFundamentals, LeverageIndicators, LeverageParams,
    LiquidityIndicators, LiquidityInputs, NetworkParams, RawIndicators, RegulatoryIndicators,
};
pub use scorers::{
    ComponentScorer, ComponentScorers, CorrelationScorer, LeverageScorer, LiquidityScorer,
    RegulatoryScorer,
};
