//! Add-ons
//!
//! Priced modifiers attached to a cart line, written as `"Label:Price"` strings
//! (e.g. `"Extra Butter:50"`).

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

/// Separates an add-on label from its price.
pub const ADDON_DELIMITER: char = ':';

/// Errors produced while parsing an add-on string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddonError {
    /// The string has no `:` between label and price.
    #[error("add-on {0:?} is missing the ':' price delimiter")]
    MissingDelimiter(String),

    /// The text after the delimiter is not a decimal number.
    #[error("add-on {0:?} has an invalid price")]
    InvalidPrice(String),
}

/// A parsed add-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    label: String,
    price: Decimal,
}

impl Addon {
    /// Create an add-on from a label and a major-unit price.
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }

    /// Add-on label. Not used for pricing.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Add-on price in major units.
    pub fn price(&self) -> Decimal {
        self.price
    }
}

impl FromStr for Addon {
    type Err = AddonError;

    /// Split on the first `:`; everything after it must parse as a decimal price.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, price) = s
            .split_once(ADDON_DELIMITER)
            .ok_or_else(|| AddonError::MissingDelimiter(s.to_string()))?;

        let price = price
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| AddonError::InvalidPrice(s.to_string()))?;

        Ok(Self::new(label.trim(), price))
    }
}

impl fmt::Display for Addon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ADDON_DELIMITER}{}", self.label, self.price)
    }
}
