//! Orders
//!
//! Turns a cart and an optional coupon code into an [`OrderSummary`].
//!
//! The stages run in a fixed order: lines are resolved and filtered, the subtotal is summed, the
//! delivery fee and GST are charged on the subtotal, the coupon selects a discount, and the
//! grand total is combined from the exact amounts and rounded once. Nothing is rounded before
//! the subtotal is known; GST is rounded on its own and every other reported figure is rounded
//! only when the summary is built.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{Span, debug};

use crate::{
    cart::{CartError, CartLine, ResolvedCart},
    charges,
    discounts::{AppliedDiscount, Coupon, DiscountError, calculate_discount},
    policy::PricingPolicy,
    pricing::{PricingError, round_money},
    summary::OrderSummary,
};

/// Errors returned when an order cannot be priced.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart is empty, has nothing billable, or a line is invalid.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// An amount could not be converted or totalled.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The coupon's discount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Money arithmetic or currency mismatch.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Compute the bill for a cart under the default policy (INR, standard delivery tiers, 5% GST).
///
/// Unknown coupon codes are ignored.
///
/// # Errors
///
/// Returns an [`OrderError`] if the cart is empty, has no line with a positive quantity, or
/// contains a malformed add-on.
pub fn compute_order(
    cart: &[CartLine],
    coupon: Option<&str>,
) -> Result<OrderSummary<'static>, OrderError> {
    compute_order_with(&PricingPolicy::default(), cart, coupon)
}

/// Compute the bill for a cart under the given policy.
///
/// # Errors
///
/// Returns an [`OrderError`] if the cart is empty, has no line with a positive quantity,
/// contains a malformed add-on, or an amount overflows.
#[tracing::instrument(
    name = "order.compute",
    skip(policy, cart),
    fields(
        line_count = cart.len(),
        coupon = ?coupon,
        billable_lines = tracing::field::Empty,
        applied_coupon = tracing::field::Empty,
        grand_total = tracing::field::Empty
    ),
    err
)]
pub fn compute_order_with(
    policy: &PricingPolicy,
    cart: &[CartLine],
    coupon: Option<&str>,
) -> Result<OrderSummary<'static>, OrderError> {
    let currency = policy.currency();
    let span = Span::current();

    let cart = ResolvedCart::resolve(cart, currency)?;

    span.record("billable_lines", cart.len());

    let subtotal = cart.subtotal()?;
    let tiered_fee = policy.delivery().fee_for(&subtotal);
    let gst = charges::gst(policy.gst_rate(), &subtotal)?;

    let coupon = coupon.and_then(Coupon::parse);

    let discount = match coupon {
        Some(coupon) => {
            span.record("applied_coupon", tracing::field::display(coupon));

            calculate_discount(&coupon.rule(currency), &subtotal, &tiered_fee)?
        }
        None => AppliedDiscount::none(currency),
    };

    let delivery_fee = if discount.waives_delivery() {
        Money::from_minor(0, currency)
    } else {
        tiered_fee
    };

    let grand_total = combine_total(&subtotal, &delivery_fee, &gst, &discount)?;

    span.record("grand_total", tracing::field::display(grand_total));

    debug!(
        subtotal = %subtotal,
        delivery_fee = %delivery_fee,
        gst = %gst,
        discount = %discount.exact().amount(),
        "order priced"
    );

    Ok(OrderSummary::new(
        cart.into_lines(),
        round_money(&subtotal),
        round_money(&delivery_fee),
        gst,
        discount.amount(),
        grand_total,
        coupon,
        currency,
    ))
}

/// `max(0, subtotal + delivery_fee + gst - discount)`, combined at full precision and rounded
/// once.
fn combine_total<'a>(
    subtotal: &Money<'a, Currency>,
    delivery_fee: &Money<'a, Currency>,
    gst: &Money<'a, Currency>,
    discount: &AppliedDiscount<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    let exact = subtotal
        .add(*delivery_fee)?
        .add(*gst)?
        .sub(discount.exact())?;

    if exact.amount().is_sign_negative() {
        return Ok(Money::from_minor(0, subtotal.currency()));
    }

    Ok(round_money(&exact))
}
