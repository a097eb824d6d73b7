//! Charges
//!
//! Delivery fees, tiered on the order subtotal, and flat-rate GST.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::pricing::{PricingError, percent_of, round_money};

/// Errors raised while building a delivery fee table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChargeError {
    /// A delivery fee table needs at least one tier.
    #[error("delivery fee table has no tiers")]
    NoTiers,

    /// Tier thresholds must be strictly ascending (index of the offending tier).
    #[error("delivery tier {0} does not start above the previous tier")]
    UnorderedTiers(usize),
}

/// A contiguous subtotal range with a fixed delivery fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryTier<'a> {
    threshold: Money<'a, Currency>,
    fee: Money<'a, Currency>,
}

impl<'a> DeliveryTier<'a> {
    /// Create a tier that applies from `threshold` (inclusive) up to the next tier.
    pub fn new(threshold: Money<'a, Currency>, fee: Money<'a, Currency>) -> Self {
        Self { threshold, fee }
    }

    /// Inclusive lower bound of the tier
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Fee charged within the tier
    pub fn fee(&self) -> &Money<'a, Currency> {
        &self.fee
    }
}

/// A step function from subtotal to delivery fee.
///
/// Each tier covers subtotals from its own threshold (inclusive) up to the next tier's threshold
/// (exclusive). The first tier also covers every subtotal below its threshold, so the table is
/// total over all subtotals.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryTiers<'a> {
    first: DeliveryTier<'a>,
    rest: SmallVec<[DeliveryTier<'a>; 2]>,
}

impl<'a> DeliveryTiers<'a> {
    /// Create a fee table from tiers in ascending threshold order.
    ///
    /// # Errors
    ///
    /// Returns a [`ChargeError`] if no tiers are given or thresholds are not strictly ascending.
    pub fn new(tiers: impl IntoIterator<Item = DeliveryTier<'a>>) -> Result<Self, ChargeError> {
        let mut tiers = tiers.into_iter();
        let first = tiers.next().ok_or(ChargeError::NoTiers)?;
        let rest: SmallVec<[DeliveryTier<'a>; 2]> = tiers.collect();

        let mut floor = *first.threshold.amount();

        for (idx, tier) in rest.iter().enumerate() {
            let threshold = *tier.threshold.amount();

            if threshold <= floor {
                return Err(ChargeError::UnorderedTiers(idx + 1));
            }

            floor = threshold;
        }

        Ok(Self { first, rest })
    }

    /// The standard table: 30 below 500, 15 from 500, free from 1000.
    pub fn standard(currency: &'a Currency) -> Self {
        Self {
            first: DeliveryTier::new(
                Money::from_minor(0, currency),
                Money::from_minor(3_000, currency),
            ),
            rest: SmallVec::from_buf([
                DeliveryTier::new(
                    Money::from_minor(50_000, currency),
                    Money::from_minor(1_500, currency),
                ),
                DeliveryTier::new(
                    Money::from_minor(100_000, currency),
                    Money::from_minor(0, currency),
                ),
            ]),
        }
    }

    /// Delivery fee for the given subtotal, compared at full precision.
    pub fn fee_for(&self, subtotal: &Money<'a, Currency>) -> Money<'a, Currency> {
        let subtotal = subtotal.amount();

        self.rest
            .iter()
            .rev()
            .find(|tier| tier.threshold.amount() <= subtotal)
            .unwrap_or(&self.first)
            .fee
    }

    /// The tiers, in ascending threshold order.
    pub fn tiers(&self) -> impl Iterator<Item = &DeliveryTier<'a>> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

/// GST on a subtotal, rounded to the nearest minor unit (half away from zero).
///
/// # Errors
///
/// Returns a [`PricingError`] if the percentage calculation overflows.
pub fn gst<'a>(
    rate: &Percentage,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    Ok(round_money(&percent_of(rate, subtotal)?))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn inr(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, INR)
    }

    #[test]
    fn standard_tier_boundaries() {
        let tiers = DeliveryTiers::standard(INR);

        assert_eq!(tiers.fee_for(&inr(0)), inr(3_000));
        assert_eq!(tiers.fee_for(&inr(49_999)), inr(3_000));
        assert_eq!(tiers.fee_for(&inr(50_000)), inr(1_500));
        assert_eq!(tiers.fee_for(&inr(99_999)), inr(1_500));
        assert_eq!(tiers.fee_for(&inr(100_000)), inr(0));
        assert_eq!(tiers.fee_for(&inr(2_500_000)), inr(0));
    }

    #[test]
    fn first_tier_covers_negative_subtotals() {
        let tiers = DeliveryTiers::standard(INR);

        assert_eq!(tiers.fee_for(&inr(-5_000)), inr(3_000));
    }

    #[test]
    fn new_rejects_empty_table() {
        let result = DeliveryTiers::new([]);

        assert_eq!(result, Err(ChargeError::NoTiers));
    }

    #[test]
    fn new_rejects_unordered_thresholds() {
        let result = DeliveryTiers::new([
            DeliveryTier::new(inr(0), inr(4_000)),
            DeliveryTier::new(inr(30_000), inr(2_000)),
            DeliveryTier::new(inr(30_000), inr(0)),
        ]);

        assert_eq!(result, Err(ChargeError::UnorderedTiers(2)));
    }

    #[test]
    fn custom_table_applies_lower_bound_inclusively() -> TestResult {
        let tiers = DeliveryTiers::new([
            DeliveryTier::new(inr(0), inr(4_000)),
            DeliveryTier::new(inr(30_000), inr(0)),
        ])?;

        assert_eq!(tiers.fee_for(&inr(29_999)), inr(4_000));
        assert_eq!(tiers.fee_for(&inr(30_000)), inr(0));
        assert_eq!(tiers.tiers().count(), 2);

        Ok(())
    }

    #[test]
    fn gst_is_five_percent_rounded_to_minor_units() -> TestResult {
        let rate = Percentage::from(0.05);

        assert_eq!(gst(&rate, &inr(33_000))?, inr(1_650));
        assert_eq!(gst(&rate, &inr(100_000))?, inr(5_000));
        assert_eq!(gst(&rate, &inr(12_345))?, inr(617));

        Ok(())
    }

    #[test]
    fn fee_for_compares_unrounded_subtotal() {
        let tiers = DeliveryTiers::standard(INR);
        let just_under = Money::from_decimal(Decimal::new(499_995, 3), INR);

        assert_eq!(tiers.fee_for(&just_under), inr(3_000));
    }

    #[test]
    fn gst_rounds_sub_minor_subtotal_once() -> TestResult {
        let rate = Percentage::from(0.05);
        let subtotal = Money::from_decimal(Decimal::new(499_995, 3), INR);

        // 24.99975
        assert_eq!(gst(&rate, &subtotal)?, inr(2_500));

        Ok(())
    }
}
