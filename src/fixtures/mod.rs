//! Fixtures
//!
//! Named sample orders and pricing policies loaded from YAML, laid out as
//! `<base>/orders/<set>.yml` and `<base>/policies/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    fixtures::orders::{FixtureOrder, OrdersFixture},
    order::OrderError,
    policy::{PolicyError, PricingPolicy},
    summary::OrderSummary,
};

pub mod orders;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Policy could not be built
    #[error("Invalid policy: {0}")]
    Policy(#[from] PolicyError),

    /// Order could not be priced
    #[error("Failed to price order: {0}")]
    Order(#[from] OrderError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Orders by key
    orders: FxHashMap<String, FixtureOrder>,

    /// Policy for the fixture set
    policy: PricingPolicy,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            orders: FxHashMap::default(),
            policy: PricingPolicy::default(),
        }
    }

    /// Load orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("orders").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OrdersFixture = serde_norway::from_str(&contents)?;

        self.orders.extend(fixture.orders);

        Ok(self)
    }

    /// Load the pricing policy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid policy.
    pub fn load_policy(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("policies").join(format!("{name}.yml"));

        self.policy = PricingPolicy::from_file(file_path)?;

        Ok(self)
    }

    /// Load a complete fixture set (orders and policy with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_orders(name)?.load_policy(name)?;

        Ok(fixture)
    }

    /// Get an order by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    pub fn order(&self, key: &str) -> Result<&FixtureOrder, FixtureError> {
        self.orders
            .get(key)
            .ok_or_else(|| FixtureError::OrderNotFound(key.to_string()))
    }

    /// Order keys, sorted
    pub fn order_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.orders.keys().map(String::as_str).collect();

        keys.sort_unstable();

        keys
    }

    /// Policy orders are priced with
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Price an order, using the coupon override if given and the order's own coupon otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or cannot be priced.
    pub fn compute(
        &self,
        key: &str,
        coupon: Option<&str>,
    ) -> Result<OrderSummary<'static>, FixtureError> {
        let order = self.order(key)?;

        let summary = self
            .policy
            .compute_order(&order.cart, coupon.or(order.coupon.as_deref()))?;

        Ok(summary)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_orders_and_policy() -> TestResult {
        let mut fixture = Fixture::new();

        fixture
            .load_orders("restaurant")?
            .load_policy("restaurant")?;

        assert!(fixture.orders.len() >= 4, "expected the sample orders");
        assert_eq!(fixture.policy().currency(), INR);

        let order = fixture.order("biryani_flat100")?;

        assert_eq!(order.cart.len(), 1);
        assert_eq!(order.coupon.as_deref(), Some("FLAT100"));

        Ok(())
    }

    #[test]
    fn fixture_order_rejects_unknown_key() -> TestResult {
        let fixture = Fixture::from_set("restaurant")?;

        assert!(matches!(
            fixture.order("nope"),
            Err(FixtureError::OrderNotFound(key)) if key == "nope"
        ));

        Ok(())
    }

    #[test]
    fn fixture_compute_uses_order_coupon_unless_overridden() -> TestResult {
        let fixture = Fixture::from_set("restaurant")?;

        let with_own = fixture.compute("biryani_flat100", None)?;
        let overridden = fixture.compute("biryani_flat100", Some("none"))?;

        assert_eq!(with_own.discount().to_minor_units(), 10_000);
        assert_eq!(overridden.discount().to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn fixture_with_custom_base_path() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "orders",
            "custom",
            "orders:\n  tea:\n    cart:\n      - name: Tea\n        price: 2.5\n        qty: 2\n",
        )?;
        write_fixture(
            dir.path(),
            "policies",
            "custom",
            "currency: GBP\ngst: 20%\ndelivery:\n  - from: 0\n    fee: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_orders("custom")?.load_policy("custom")?;

        let summary = fixture.compute("tea", None)?;

        assert_eq!(summary.currency(), GBP);
        assert_eq!(summary.subtotal().to_minor_units(), 500);
        assert_eq!(summary.delivery_fee().to_minor_units(), 100);
        assert_eq!(summary.gst().to_minor_units(), 100);
        assert_eq!(summary.grand_total().to_minor_units(), 700);
        assert_eq!(fixture.order_keys(), ["tea"]);

        Ok(())
    }

    #[test]
    fn fixture_rejects_cart_that_is_not_a_list() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "orders",
            "broken",
            "orders:\n  bad:\n    cart: Biryani\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_orders("broken"),
            Err(FixtureError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_orders("restaurant"),
            Err(FixtureError::Io(_))
        ));
    }
}
