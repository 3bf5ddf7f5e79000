use crate::entities::Side;
use serde::{Deserialize, Serialize};

/// Days each leg is held before its scheduled exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoldPeriod {
    pub long_days: u32,
    pub short_days: u32,
    /// Zero unless a gold hedge is active
    pub gold_days: u32,
}

impl HoldPeriod {
    pub fn days(&self, side: Side) -> u32 {
        match side {
            Side::Long => self.long_days,
            Side::Short => self.short_days,
        }
    }
}
