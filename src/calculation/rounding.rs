//! Monetary and hour rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places hour quantities are rounded to.
pub const HOURS_DP: u32 = 2;

/// Rounds `value` to `dp` places, halves away from zero.
///
/// ```
/// use hr_engine::calculation::round_to;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to(Decimal::from_str("1581.245").unwrap(), 2), Decimal::from_str("1581.25").unwrap());
/// assert_eq!(round_to(Decimal::from_str("-0.125").unwrap(), 2), Decimal::from_str("-0.13").unwrap());
/// ```
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an hour quantity to two places.
pub fn round_hours(value: Decimal) -> Decimal {
    round_to(value, HOURS_DP)
}
