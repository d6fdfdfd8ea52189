//! Currency rounding and float conversions.
//!
//! Capital, stakes and payouts stay in `Decimal` end to end. Floats only appear
//! for probabilities and for derived statistics.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the smallest currency unit using banker's rounding (half-to-even).
#[must_use]
pub fn round_currency(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

/// Drops fractions below the smallest currency unit, rounding toward zero.
///
/// Used for stakes so that truncation can never push a stake above a cap.
#[must_use]
pub fn truncate_currency(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::ToZero)
}

/// Converts a probability or ratio into a `Decimal`.
///
/// Non-finite inputs map to zero.
#[must_use]
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
