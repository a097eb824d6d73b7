//! Order Summary
//!
//! The reconciled bill for an order and its printable receipt.

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{discounts::Coupon, items::ResolvedLine};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Final bill for a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary<'a> {
    /// Billable lines in cart order
    items: SmallVec<[ResolvedLine<'a>; 10]>,

    /// Sum of line totals
    subtotal: Money<'a, Currency>,

    /// Delivery fee charged (zero when waived by a coupon)
    delivery_fee: Money<'a, Currency>,

    /// GST on the subtotal
    gst: Money<'a, Currency>,

    /// Discount given by the coupon
    discount: Money<'a, Currency>,

    /// Amount payable, never negative
    grand_total: Money<'a, Currency>,

    /// Coupon that was applied, if the code was recognised
    coupon: Option<Coupon>,

    /// Currency used for all monetary values
    currency: &'a Currency,
}

impl<'a> OrderSummary<'a> {
    /// Create a new summary with the given details.
    #[expect(clippy::too_many_arguments, reason = "one argument per bill field")]
    #[must_use]
    pub fn new(
        items: SmallVec<[ResolvedLine<'a>; 10]>,
        subtotal: Money<'a, Currency>,
        delivery_fee: Money<'a, Currency>,
        gst: Money<'a, Currency>,
        discount: Money<'a, Currency>,
        grand_total: Money<'a, Currency>,
        coupon: Option<Coupon>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            items,
            subtotal,
            delivery_fee,
            gst,
            discount,
            grand_total,
            coupon,
            currency,
        }
    }

    /// Billable lines in cart order
    pub fn items(&self) -> &[ResolvedLine<'a>] {
        &self.items
    }

    /// Sum of line totals
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Delivery fee charged
    pub fn delivery_fee(&self) -> Money<'a, Currency> {
        self.delivery_fee
    }

    /// GST on the subtotal
    pub fn gst(&self) -> Money<'a, Currency> {
        self.gst
    }

    /// Discount given by the coupon, rounded to the minor unit.
    ///
    /// Each reported figure is rounded on its own, while the grand total is rounded once from the
    /// exact amounts, so `subtotal + delivery_fee + gst - discount` can differ from
    /// [`Self::grand_total`] by one minor unit. `FIRST50` on a 100.01 subtotal reports fields
    /// that sum to 85.00 (`100.01 + 30.00 + 5.00 - 50.01`) with a grand total of 85.01.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable, rounded once from the exact charges and discount
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Coupon that was applied
    pub fn coupon(&self) -> Option<Coupon> {
        self.coupon
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Total charges before the discount: subtotal, delivery and GST.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn charges(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.add(self.delivery_fee)?.add(self.gst)
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Price", "Add-ons", "Total"]);

        for (idx, line) in self.items.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name().to_string(),
                line.qty().to_string(),
                format!("{}", line.base_price()),
                addon_cell(line),
                format!("{}", line.item_total()),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_totals(&mut out)?;

        Ok(())
    }

    fn write_totals(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        let discount_label = match self.coupon {
            Some(coupon) => format!("Discount ({coupon}):"),
            None => "Discount:".to_string(),
        };

        let rows = [
            ("Subtotal:".to_string(), format!("{}", self.subtotal)),
            ("Delivery:".to_string(), format!("{}", self.delivery_fee)),
            ("GST:".to_string(), format!("{}", self.gst)),
            (discount_label, format!("-{}", self.discount)),
            ("Grand Total:".to_string(), format!("{}", self.grand_total)),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = rows
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out)?;

        Ok(())
    }
}

/// Add-on labels and prices, one per line.
fn addon_cell(line: &ResolvedLine<'_>) -> String {
    line.addons()
        .iter()
        .map(|addon| format!("{} +{}", addon.label(), addon.price()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the visible width of a string.
fn visible_width(s: &str) -> usize {
    s.chars().count()
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), SummaryError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        " {:label_pad$}{label}  {:value_pad$}{value}",
        "", ""
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::INR;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::addons::Addon;

    use super::*;

    fn inr(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, INR)
    }

    fn test_summary() -> Result<OrderSummary<'static>, crate::items::LineError> {
        let biryani = ResolvedLine::new(
            "Biryani".to_string(),
            1,
            inr(30_000),
            [Addon::new("Raita", Decimal::from(30))],
        )?;

        Ok(OrderSummary::new(
            smallvec![biryani],
            inr(33_000),
            inr(3_000),
            inr(1_650),
            inr(10_000),
            inr(27_650),
            Some(Coupon::Flat100),
            INR,
        ))
    }

    #[test]
    fn accessors_return_values_from_constructor() -> TestResult {
        let summary = test_summary()?;

        assert_eq!(summary.items().len(), 1);
        assert_eq!(summary.subtotal(), inr(33_000));
        assert_eq!(summary.delivery_fee(), inr(3_000));
        assert_eq!(summary.gst(), inr(1_650));
        assert_eq!(summary.discount(), inr(10_000));
        assert_eq!(summary.grand_total(), inr(27_650));
        assert_eq!(summary.coupon(), Some(Coupon::Flat100));
        assert_eq!(summary.currency(), INR);

        Ok(())
    }

    #[test]
    fn charges_adds_subtotal_delivery_and_gst() -> TestResult {
        let summary = test_summary()?;

        assert_eq!(summary.charges()?, inr(37_650));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_totals() -> TestResult {
        let summary = test_summary()?;
        let mut out = Vec::new();

        summary.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Biryani"), "missing line name:\n{rendered}");
        assert!(rendered.contains("Raita +30"), "missing add-on:\n{rendered}");
        assert!(rendered.contains("Discount (FLAT100):"), "missing coupon:\n{rendered}");
        assert!(rendered.contains("Grand Total:"), "missing total:\n{rendered}");

        Ok(())
    }

    #[test]
    fn write_summary_line_pads_label_and_value() -> TestResult {
        let mut out = Vec::new();

        write_summary_line(&mut out, "GST:", "16.50", 10, 8)?;

        assert_eq!(String::from_utf8(out)?, "       GST:     16.50\n");

        Ok(())
    }
}
