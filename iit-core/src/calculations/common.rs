//! Money helpers shared by the withholding calculations.
//!
//! Every amount is a [`Decimal`]; nothing in the calculation path passes
//! through binary floating point.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use iit_core::calculations::common::round_to_cents;
///
/// assert_eq!(round_to_cents(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_to_cents(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_to_cents(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative amounts to zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use iit_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Exact sum of a sequence of amounts.
pub fn sum_exact<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}
