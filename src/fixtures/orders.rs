//! Order Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::cart::CartLine;

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Map of order key -> order
    pub orders: FxHashMap<String, FixtureOrder>,
}

/// A sample order: a cart and the coupon entered with it
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureOrder {
    /// Cart lines in input order
    pub cart: Vec<CartLine>,

    /// Coupon code, if any
    #[serde(default)]
    pub coupon: Option<String>,
}
