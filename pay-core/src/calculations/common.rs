//! Common rounding helpers for pay amounts.
//!
//! Amounts are carried at full precision through the pipeline; rounding is
//! applied either by calculator backends (to cents) or by the presentation
//! layer (to a configurable number of places).

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pay_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(842.7019)), dec!(842.70));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// Rounds `value` to `decimal_places` using half-away-from-zero rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pay_core::calculations::common::round_to;
///
/// assert_eq!(round_to(dec!(4333.3333), 0), dec!(4333));
/// assert_eq!(round_to(dec!(4333.3333), 3), dec!(4333.333));
/// ```
pub fn round_to(
    value: Decimal,
    decimal_places: u32,
) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}
