//! Cart

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    items::{LineError, ResolvedLine},
    pricing::{PricingError, total_price},
};

/// Errors related to cart validation and line resolution.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The cart has no lines at all.
    #[error("cart is empty")]
    EmptyCart,

    /// Every line in the cart had a quantity of zero or less.
    #[error("cart has no lines with a positive quantity")]
    NoBillableLines,

    /// A line could not be resolved (line index, cause).
    #[error("cart line {line} is invalid: {source}")]
    Line {
        /// Position of the line within the cart
        line: usize,

        /// Resolution failure
        #[source]
        source: LineError,
    },
}

/// One entry in a cart as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartLine {
    /// Line name
    pub name: String,

    /// Unit price in major units
    pub price: Decimal,

    /// Quantity; lines with a quantity of zero or less are ignored
    pub qty: i64,

    /// Add-ons in `"Label:Price"` form
    #[serde(default)]
    pub addons: Vec<String>,
}

impl CartLine {
    /// Create a cart line without add-ons.
    pub fn new(name: impl Into<String>, price: Decimal, qty: i64) -> Self {
        Self {
            name: name.into(),
            price,
            qty,
            addons: Vec::new(),
        }
    }

    /// Attach add-on strings to the line.
    #[must_use]
    pub fn with_addons<S: Into<String>>(mut self, addons: impl IntoIterator<Item = S>) -> Self {
        self.addons = addons.into_iter().map(Into::into).collect();
        self
    }
}

/// The billable lines of a cart, resolved in a single currency.
#[derive(Debug, Clone)]
pub struct ResolvedCart<'a> {
    lines: SmallVec<[ResolvedLine<'a>; 10]>,
    currency: &'a Currency,
}

impl<'a> ResolvedCart<'a> {
    /// Resolve every line of a cart, keeping input order and dropping lines with a quantity of
    /// zero or less.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the cart is empty, has no billable lines, or a line cannot be
    /// resolved.
    pub fn resolve(cart: &[CartLine], currency: &'a Currency) -> Result<Self, CartError> {
        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let mut lines = SmallVec::new();

        for (index, line) in cart.iter().enumerate() {
            let resolved = ResolvedLine::resolve(line, currency)
                .map_err(|source| CartError::Line { line: index, source })?;

            match resolved {
                Some(resolved) => lines.push(resolved),
                None => tracing::debug!(line = index, qty = line.qty, "skipping cart line"),
            }
        }

        if lines.is_empty() {
            return Err(CartError::NoBillableLines);
        }

        Ok(Self { lines, currency })
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        total_price(&self.lines)
    }

    /// Get the number of billable lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no billable lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the billable lines.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedLine<'a>> {
        self.lines.iter()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Consume the cart, returning its lines.
    pub fn into_lines(self) -> SmallVec<[ResolvedLine<'a>; 10]> {
        self.lines
    }
}
