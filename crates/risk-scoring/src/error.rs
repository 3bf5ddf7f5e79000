//! Scoring errors

use sentinel_core::{AsOf, RiskComponent, Score};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Invalid {component} component score {value} as of {as_of}: outside [0, 1]")]
    InvalidComponentScore {
        as_of: AsOf,
        component: RiskComponent,
        value: Score,
    },

    #[error("Insufficient data for {series}: need {required}, have {actual}")]
    InsufficientData {
        series: String,
        required: usize,
        actual: usize,
    },

    #[error("Invalid calibration table {table}: {reason}")]
    InvalidCalibration { table: String, reason: String },
}

impl ScoringError {
    pub(crate) fn calibration(table: &str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidCalibration {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
