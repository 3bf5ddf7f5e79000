//! Sentinel Ports
//!
//! Port definitions (traits) for the Sentinel decision engine.
//! These define the boundaries between the scoring core and its
//! collaborators: market data in, telemetry out.

mod error;
mod market_data;
mod telemetry;

pub use error::{MarketDataError, MarketDataResult};
pub use market_data::{MarketDataPort, Observation, SeriesId, TimeSeries};
pub use telemetry::{DecisionObserver, LogObserver, NoopObserver};
