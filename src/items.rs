//! Items
//!
//! A cart line after resolution: base price, add-ons and line total in the order currency.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    addons::{Addon, AddonError},
    cart::CartLine,
};

/// Errors raised while resolving a single cart line.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    /// An add-on string could not be parsed (add-on index, parse error).
    #[error("add-on {addon} is malformed")]
    Addon {
        /// Position of the add-on within the line
        addon: usize,

        /// Parse failure
        #[source]
        source: AddonError,
    },

    /// The quantity does not fit a resolved line.
    #[error("quantity {0} is out of range")]
    Quantity(i64),

    /// The line total overflowed.
    #[error("line total overflowed")]
    Overflow,
}

/// A priced cart line
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine<'a> {
    name: String,
    qty: u32,
    base_price: Money<'a, Currency>,
    addons: SmallVec<[Addon; 4]>,
    addon_total: Money<'a, Currency>,
    item_total: Money<'a, Currency>,
}

impl<'a> ResolvedLine<'a> {
    /// Price a line: `(base_price + addon_total) * qty`.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::Overflow`] if the line total overflows.
    pub fn new(
        name: String,
        qty: u32,
        base_price: Money<'a, Currency>,
        addons: impl IntoIterator<Item = Addon>,
    ) -> Result<Self, LineError> {
        let addons: SmallVec<[Addon; 4]> = addons.into_iter().collect();

        let addon_amount = addons
            .iter()
            .try_fold(Decimal::ZERO, |acc, addon| acc.checked_add(addon.price()))
            .ok_or(LineError::Overflow)?;

        let item_amount = base_price
            .amount()
            .checked_add(addon_amount)
            .and_then(|unit| unit.checked_mul(Decimal::from(qty)))
            .ok_or(LineError::Overflow)?;

        let currency = base_price.currency();

        Ok(Self {
            name,
            qty,
            base_price,
            addons,
            addon_total: Money::from_decimal(addon_amount, currency),
            item_total: Money::from_decimal(item_amount, currency),
        })
    }

    /// Resolve a cart line in the given currency.
    ///
    /// Returns `Ok(None)` for lines with a quantity of zero or less; those lines are left out of
    /// the order entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] if an add-on is malformed, the quantity is too large, or the line
    /// total overflows.
    pub fn resolve(line: &CartLine, currency: &'a Currency) -> Result<Option<Self>, LineError> {
        if line.qty <= 0 {
            return Ok(None);
        }

        let qty = u32::try_from(line.qty).map_err(|_err| LineError::Quantity(line.qty))?;

        let addons = line
            .addons
            .iter()
            .enumerate()
            .map(|(addon, raw)| {
                raw.parse::<Addon>()
                    .map_err(|source| LineError::Addon { addon, source })
            })
            .collect::<Result<SmallVec<[Addon; 4]>, LineError>>()?;

        let base_price = Money::from_decimal(line.price, currency);

        Self::new(line.name.clone(), qty, base_price, addons).map(Some)
    }

    /// Line name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity ordered
    pub fn qty(&self) -> u32 {
        self.qty
    }

    /// Unit price before add-ons
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Parsed add-ons, in input order
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    /// Sum of add-on prices for one unit
    pub fn addon_total(&self) -> &Money<'a, Currency> {
        &self.addon_total
    }

    /// `(base_price + addon_total) * qty`
    pub fn item_total(&self) -> &Money<'a, Currency> {
        &self.item_total
    }
}
