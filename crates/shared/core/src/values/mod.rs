use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Risk score value - uses Decimal so band boundaries compare exactly
pub type Score = Decimal;

/// Fraction of available equity (0.54 = 54%)
pub type EquityPct = Decimal;

/// Leverage multiple (4.0 = 4x)
pub type Leverage = Decimal;

/// Point-in-time date a computation is anchored to
pub type AsOf = NaiveDate;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;
