//! Engine errors

use sentinel_core::AsOf;
use sentinel_decision::TableError;
use sentinel_scoring::ScoringError;
use thiserror::Error;

/// Configuration rejected at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Invalid {section} config: {reason}")]
    Invalid { section: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(section: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section: section.to_string(),
            reason: reason.into(),
        }
    }
}

/// A decision that could not be made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Data unavailable for {series} as of {as_of}: {reason}")]
    DataUnavailable {
        as_of: AsOf,
        series: String,
        reason: String,
    },

    #[error("Retrieval of {series} as of {as_of} exceeded the deadline")]
    RetrievalTimeout { as_of: AsOf, series: String },
}

impl DecisionError {
    pub fn as_of(&self) -> AsOf {
        match self {
            DecisionError::DataUnavailable { as_of, .. }
            | DecisionError::RetrievalTimeout { as_of, .. } => *as_of,
        }
    }

    pub fn series(&self) -> &str {
        match self {
            DecisionError::DataUnavailable { series, .. }
            | DecisionError::RetrievalTimeout { series, .. } => series,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DecisionError::RetrievalTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, DecisionError>;
