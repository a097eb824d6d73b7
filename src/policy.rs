//! Pricing Policy
//!
//! The currency, delivery fee table and GST rate an order is priced with. The default policy
//! bills in INR with the standard delivery tiers and 5% GST; other policies can be loaded from
//! YAML:
//!
//! ```yaml
//! currency: INR
//! gst: 5%
//! delivery:
//!   - from: 0
//!     fee: 30
//!   - from: 500
//!     fee: 15
//!   - from: 1000
//!     fee: 0
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::CartLine,
    charges::{ChargeError, DeliveryTier, DeliveryTiers},
    order::{OrderError, compute_order_with},
    summary::OrderSummary,
};

/// Policy loading errors
#[derive(Debug, Error)]
pub enum PolicyError {
    /// IO error reading a policy file
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid delivery fee table
    #[error(transparent)]
    Charges(#[from] ChargeError),
}

/// Pricing rules applied to every order.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    currency: &'static Currency,
    delivery: DeliveryTiers<'static>,
    gst_rate: Percentage,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::standard(iso::INR)
    }
}

impl PricingPolicy {
    /// Create a policy from its parts.
    pub fn new(
        currency: &'static Currency,
        delivery: DeliveryTiers<'static>,
        gst_rate: Percentage,
    ) -> Self {
        Self {
            currency,
            delivery,
            gst_rate,
        }
    }

    /// Standard delivery tiers and 5% GST in the given currency.
    pub fn standard(currency: &'static Currency) -> Self {
        Self::new(
            currency,
            DeliveryTiers::standard(currency),
            Percentage::from(0.05),
        )
    }

    /// Parse a policy from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the document is not valid YAML, names an unknown currency, or
    /// describes an invalid rate or delivery table.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        let fixture: PolicyFixture = serde_norway::from_str(yaml)?;

        fixture.try_into()
    }

    /// Load a policy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Currency every amount is billed in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Delivery fee table
    pub fn delivery(&self) -> &DeliveryTiers<'static> {
        &self.delivery
    }

    /// GST rate applied to the subtotal
    pub fn gst_rate(&self) -> &Percentage {
        &self.gst_rate
    }

    /// Compute the bill for a cart under this policy.
    ///
    /// # Errors
    ///
    /// See [`compute_order_with`].
    pub fn compute_order(
        &self,
        cart: &[CartLine],
        coupon: Option<&str>,
    ) -> Result<OrderSummary<'static>, OrderError> {
        compute_order_with(self, cart, coupon)
    }
}

/// Policy as written in YAML
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    /// ISO currency code (e.g., "INR")
    pub currency: String,

    /// GST rate (e.g., "5%" or "0.05")
    pub gst: String,

    /// Delivery tiers in ascending threshold order
    pub delivery: Vec<TierFixture>,
}

/// Delivery tier as written in YAML
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Subtotal the tier starts at, in major units
    pub from: Decimal,

    /// Delivery fee within the tier, in major units
    pub fee: Decimal,
}

impl TryFrom<PolicyFixture> for PricingPolicy {
    type Error = PolicyError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;
        let gst_rate = parse_percentage(&fixture.gst)?;

        let tiers = fixture.delivery.iter().map(|tier| {
            DeliveryTier::new(
                Money::from_decimal(tier.from, currency),
                Money::from_decimal(tier.fee, currency),
            )
        });

        Ok(Self::new(currency, DeliveryTiers::new(tiers)?, gst_rate))
    }
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`PolicyError::UnknownCurrency`] for codes other than INR, GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, PolicyError> {
    match code.trim() {
        "INR" => Ok(iso::INR),
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(PolicyError::UnknownCurrency(other.to_string())),
    }
}

/// Parse percentage string (e.g., "5%" or "0.05") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a number.
pub fn parse_percentage(s: &str) -> Result<Percentage, PolicyError> {
    let trimmed = s.trim();

    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(percent_str) => (percent_str.trim(), 100.0),
        None => (trimmed, 1.0),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_err| PolicyError::InvalidPercentage(s.to_string()))?;

    if !value.is_finite() {
        return Err(PolicyError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value / scale))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use crate::pricing::percent_fraction;

    use super::*;

    const STANDARD_YAML: &str = "
currency: INR
gst: 5%
delivery:
  - from: 0
    fee: 30
  - from: 500
    fee: 15
  - from: 1000
    fee: 0
";

    #[test]
    fn default_is_standard_inr() {
        let policy = PricingPolicy::default();

        assert_eq!(policy.currency(), iso::INR);
        assert_eq!(policy.delivery(), &DeliveryTiers::standard(iso::INR));
        assert_eq!(percent_fraction(policy.gst_rate()), Decimal::new(5, 2));
    }

    #[test]
    fn yaml_matches_default_policy() -> TestResult {
        let policy = PricingPolicy::from_yaml_str(STANDARD_YAML)?;
        let standard = PricingPolicy::default();

        assert_eq!(policy.currency(), standard.currency());
        assert_eq!(policy.delivery(), standard.delivery());
        assert_eq!(
            percent_fraction(policy.gst_rate()),
            percent_fraction(standard.gst_rate())
        );

        Ok(())
    }

    #[test]
    fn yaml_accepts_decimal_rate_and_string_amounts() -> TestResult {
        let policy = PricingPolicy::from_yaml_str(
            "currency: GBP\ngst: '0.2'\ndelivery:\n  - from: '0'\n    fee: '3.99'\n",
        )?;

        assert_eq!(policy.currency(), iso::GBP);
        assert_eq!(percent_fraction(policy.gst_rate()), Decimal::new(2, 1));
        assert_eq!(
            policy.delivery().fee_for(&Money::from_minor(10_000, iso::GBP)),
            Money::from_minor(399, iso::GBP)
        );

        Ok(())
    }

    #[test]
    fn from_file_reads_yaml() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(STANDARD_YAML.as_bytes())?;

        let policy = PricingPolicy::from_file(file.path())?;

        assert_eq!(policy.delivery(), &DeliveryTiers::standard(iso::INR));

        Ok(())
    }

    #[test]
    fn rejects_unknown_currency() {
        let result = PricingPolicy::from_yaml_str(
            "currency: XYZ\ngst: 5%\ndelivery:\n  - from: 0\n    fee: 30\n",
        );

        assert!(matches!(result, Err(PolicyError::UnknownCurrency(code)) if code == "XYZ"));
    }

    #[test]
    fn rejects_empty_delivery_table() {
        let result = PricingPolicy::from_yaml_str("currency: INR\ngst: 5%\ndelivery: []\n");

        assert!(matches!(
            result,
            Err(PolicyError::Charges(ChargeError::NoTiers))
        ));
    }

    #[test]
    fn rejects_invalid_percentage() {
        assert!(matches!(
            parse_percentage("five"),
            Err(PolicyError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("NaN%"),
            Err(PolicyError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn rejects_delivery_that_is_not_a_list() {
        let result = PricingPolicy::from_yaml_str("currency: INR\ngst: 5%\ndelivery: free\n");

        assert!(matches!(result, Err(PolicyError::Yaml(_))));
    }
}
