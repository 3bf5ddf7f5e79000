use crate::entities::RiskComponent;
use crate::values::{AsOf, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal conditions raised while deciding
///
/// These never abort a decision but are carried on it so nothing is
/// silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskWarning {
    /// A sub-scorer produced a value outside [0, 1]; it was clamped
    InvalidComponentScore {
        as_of: AsOf,
        component: RiskComponent,
        value: Score,
    },
    /// Fewer historical samples than the trend mode needs
    InsufficientHistory {
        as_of: AsOf,
        missing: Vec<AsOf>,
        /// Series or component that could not be loaded
        series: String,
    },
}

impl RiskWarning {
    pub fn as_of(&self) -> AsOf {
        match self {
            RiskWarning::InvalidComponentScore { as_of, .. } => *as_of,
            RiskWarning::InsufficientHistory { as_of, .. } => *as_of,
        }
    }
}

impl fmt::Display for RiskWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskWarning::InvalidComponentScore {
                as_of,
                component,
                value,
            } => write!(
                f,
                "invalid {} component score {} as of {} (clamped to [0, 1])",
                component, value, as_of
            ),
            RiskWarning::InsufficientHistory {
                as_of,
                missing,
                series,
            } => {
                let dates: Vec<String> = missing.iter().map(|d| d.to_string()).collect();
                write!(
                    f,
                    "insufficient history as of {}: missing [{}] ({})",
                    as_of,
                    dates.join(", "),
                    series
                )
            }
        }
    }
}
