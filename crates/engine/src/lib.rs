//! Sentinel Decision Engine
//!
//! Turns an index-membership event into a risk-aware trading decision:
//!
//! ```text
//! ┌────────────────┐     ┌──────────────────────────────────────────────┐
//! │ MarketDataPort │────►│ CachedMarketData ─► SnapshotLoader           │
//! │   (adapter)    │     │        │                                     │
//! └────────────────┘     │        ▼                                     │
//!                        │ scorers ─► calculator ─► classifier          │
//!                        │        │                                     │
//!  DecisionRequest ─────►│        ▼                                     │
//!                        │ trend (MEDIUM+) ─► sizing / hold / hedge     │──► Decision
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let engine = DecisionEngine::from_market_data(adapter, EngineConfig::default())?;
//! let request = DecisionRequest::for_event(as_of, "DECK", EventType::Addition);
//! let decision = engine.decide(&request).await?;
//! let leg = decision.primary_leg();
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod in_memory;
pub mod snapshot;
pub mod source;
pub mod trend;

pub use cache::{CachedMarketData, IndicatorCache};
pub use config::{
    EngineConfig, IndicatorConfig, RetrievalConfig, SeriesCatalog, TrendConfig,
};
pub use engine::{DecisionEngine, MarketDecisionEngine};
pub use error::{ConfigError, DecisionError, Result};
pub use in_memory::InMemoryMarketData;
pub use snapshot::SnapshotLoader;
pub use source::{MarketScoreSource, ScoreSource};
pub use trend::{HistoricalTrendAnalyzer, TrendAnalysis};
