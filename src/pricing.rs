//! Pricing
//!
//! Rounding, percentage helpers and totals shared by every stage of an order.
//!
//! Amounts are carried at full precision until a reported figure is produced; only then are they
//! rounded to the currency's minor unit.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::ResolvedLine;

/// Decimal places kept when reading a percentage back out as a fraction.
const PERCENT_SCALE: u32 = 10;

/// Errors that can occur while converting or totalling amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No lines were provided, so currency could not be determined.
    #[error("no lines provided; cannot determine currency")]
    NoItems,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Round an amount to the currency's minor unit, half away from zero.
pub fn round_money<'a>(money: &Money<'a, Currency>) -> Money<'a, Currency> {
    let currency = money.currency();
    let rounded = money
        .amount()
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, currency)
}

/// The fractional value of a percentage (`5%` is `0.05`).
pub fn percent_fraction(percent: &Percentage) -> Decimal {
    // Percentages built from an `f64` can carry binary noise in the last digits.
    ((*percent) * Decimal::ONE).round_dp(PERCENT_SCALE)
}

/// Apply a percentage to an amount without rounding.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the multiplication overflows.
pub fn percent_of<'a>(
    percent: &Percentage,
    money: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let amount = percent_fraction(percent)
        .checked_mul(*money.amount())
        .ok_or(PricingError::PercentConversion)?;

    Ok(Money::from_decimal(amount, money.currency()))
}

/// Calculates the total of a list of resolved lines.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No lines were provided, so currency could not be determined.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(lines: &[ResolvedLine<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = lines.first().ok_or(PricingError::NoItems)?;

    let total = lines.iter().try_fold(
        Money::from_minor(0, first.item_total().currency()),
        |acc, line| acc.add(*line.item_total()),
    )?;

    Ok(total)
}
