use crate::entities::Side;
use crate::values::{AsOf, Symbol};
use serde::{Deserialize, Serialize};

/// Index membership change reported by the event-detection collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Addition,
    Removal,
}

impl EventType {
    /// Added names are bought, removed names are shorted
    pub fn default_side(&self) -> Side {
        match self {
            EventType::Addition => Side::Long,
            EventType::Removal => Side::Short,
        }
    }
}

/// Input to a single decision call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub as_of: AsOf,
    pub side: Side,
    pub symbol: Symbol,
    pub event_type: EventType,
}

impl DecisionRequest {
    pub fn new(as_of: AsOf, side: Side, symbol: impl Into<Symbol>, event_type: EventType) -> Self {
        Self {
            as_of,
            side,
            symbol: symbol.into(),
            event_type,
        }
    }

    /// Build a request whose side follows the event type
    pub fn for_event(as_of: AsOf, symbol: impl Into<Symbol>, event_type: EventType) -> Self {
        Self::new(as_of, event_type.default_side(), symbol, event_type)
    }
}
