use sentinel_core::AsOf;
use thiserror::Error;

/// Errors raised by market-data adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Series {series} not available as of {as_of}")]
    NotFound { series: String, as_of: AsOf },

    #[error("Timed out fetching {series} as of {as_of}")]
    Timeout { series: String, as_of: AsOf },

    #[error("Upstream failure fetching {series} as of {as_of}: {message}")]
    Upstream {
        series: String,
        as_of: AsOf,
        message: String,
    },
}

impl MarketDataError {
    /// Identifier of the offending series
    pub fn series(&self) -> &str {
        match self {
            MarketDataError::NotFound { series, .. }
            | MarketDataError::Timeout { series, .. }
            | MarketDataError::Upstream { series, .. } => series,
        }
    }

    pub fn as_of(&self) -> AsOf {
        match self {
            MarketDataError::NotFound { as_of, .. }
            | MarketDataError::Timeout { as_of, .. }
            | MarketDataError::Upstream { as_of, .. } => *as_of,
        }
    }
}

pub type MarketDataResult<T> = std::result::Result<T, MarketDataError>;
