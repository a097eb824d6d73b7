//! Tiffin
//!
//! Tiffin prices food-delivery orders: it resolves cart lines and their add-ons, charges tiered
//! delivery and GST on the subtotal, applies a coupon, and reconciles everything into a single
//! grand total.
//!
//! ```
//! use rust_decimal::Decimal;
//! use tiffin::prelude::*;
//!
//! let cart = [CartLine::new("Biryani", Decimal::from(300), 1).with_addons(["Raita:30"])];
//! let summary = compute_order(&cart, Some("FLAT100"))?;
//!
//! assert_eq!(summary.grand_total().to_minor_units(), 27_650);
//! # Ok::<(), OrderError>(())
//! ```

pub mod addons;
pub mod cart;
pub mod charges;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod order;
pub mod policy;
pub mod prelude;
pub mod pricing;
pub mod summary;
pub mod utils;
