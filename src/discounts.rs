//! Discounts
//!
//! Coupon codes form a closed set. Each coupon selects exactly one [`DiscountRule`], and every
//! rule has its own arm in [`calculate_discount`].

use std::fmt;

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{percent_of, round_money};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// A coupon code accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coupon {
    /// Half off the subtotal, capped at 150.
    First50,

    /// A flat 100 off.
    Flat100,

    /// Delivery is free; the waived fee is reported as the discount.
    FreeShip,
}

impl Coupon {
    /// Every coupon, in display order.
    pub const ALL: [Coupon; 3] = [Coupon::First50, Coupon::Flat100, Coupon::FreeShip];

    /// Look up a coupon by code, ignoring case.
    ///
    /// Unknown codes are not an error; they simply select no coupon.
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "first50" => Some(Coupon::First50),
            "flat100" => Some(Coupon::Flat100),
            "freeship" => Some(Coupon::FreeShip),
            _ => None,
        }
    }

    /// Canonical code for the coupon
    pub const fn code(self) -> &'static str {
        match self {
            Coupon::First50 => "FIRST50",
            Coupon::Flat100 => "FLAT100",
            Coupon::FreeShip => "FREESHIP",
        }
    }

    /// The discount rule this coupon selects.
    pub fn rule<'a>(self, currency: &'a Currency) -> DiscountRule<'a> {
        match self {
            Coupon::First50 => DiscountRule::PercentOfSubtotalCapped {
                percent: Percentage::from(0.5),
                cap: Money::from_minor(15_000, currency),
            },
            Coupon::Flat100 => DiscountRule::AmountOff(Money::from_minor(10_000, currency)),
            Coupon::FreeShip => DiscountRule::WaiveDelivery,
        }
    }
}

impl fmt::Display for Coupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a discount is derived from an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountRule<'a> {
    /// A percentage of the subtotal, never more than `cap`.
    PercentOfSubtotalCapped {
        /// Share of the subtotal taken off
        percent: Percentage,

        /// Largest discount the rule can give
        cap: Money<'a, Currency>,
    },

    /// A fixed amount off, regardless of subtotal. May exceed the subtotal.
    AmountOff(Money<'a, Currency>),

    /// The delivery fee is waived and reported as the discount.
    WaiveDelivery,
}

/// The outcome of applying a discount rule to an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedDiscount<'a> {
    /// Discount at full precision
    exact: Money<'a, Currency>,

    waives_delivery: bool,
}

impl<'a> AppliedDiscount<'a> {
    /// No discount.
    pub fn none(currency: &'a Currency) -> Self {
        Self {
            exact: Money::from_minor(0, currency),
            waives_delivery: false,
        }
    }

    /// Discount before any rounding.
    pub fn exact(&self) -> Money<'a, Currency> {
        self.exact
    }

    /// Whether the delivery fee should be dropped from the bill.
    pub fn waives_delivery(&self) -> bool {
        self.waives_delivery
    }

    /// The discount rounded to the nearest minor unit.
    pub fn amount(&self) -> Money<'a, Currency> {
        round_money(&self.exact)
    }
}

/// Calculates the discount a rule gives on an order.
///
/// `subtotal` is taken at full precision and `delivery_fee` is the tiered fee the order would pay
/// without any coupon.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if a percentage calculation overflows.
pub fn calculate_discount<'a>(
    rule: &DiscountRule<'a>,
    subtotal: &Money<'a, Currency>,
    delivery_fee: &Money<'a, Currency>,
) -> Result<AppliedDiscount<'a>, DiscountError> {
    let (exact, waives_delivery) = match rule {
        DiscountRule::PercentOfSubtotalCapped { percent, cap } => {
            let share =
                percent_of(percent, subtotal).map_err(|_err| DiscountError::PercentConversion)?;

            let capped = if share.amount() > cap.amount() {
                *cap
            } else {
                share
            };

            (capped, false)
        }
        DiscountRule::AmountOff(amount) => (*amount, false),
        DiscountRule::WaiveDelivery => (*delivery_fee, true),
    };

    Ok(AppliedDiscount {
        exact,
        waives_delivery,
    })
}
