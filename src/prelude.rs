//! Tiffin prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    addons::{Addon, AddonError},
    cart::{CartError, CartLine, ResolvedCart},
    charges::{ChargeError, DeliveryTier, DeliveryTiers, gst},
    discounts::{AppliedDiscount, Coupon, DiscountError, DiscountRule, calculate_discount},
    items::{LineError, ResolvedLine},
    order::{OrderError, compute_order, compute_order_with},
    policy::{PolicyError, PricingPolicy},
    pricing::PricingError,
    summary::{OrderSummary, SummaryError},
};
