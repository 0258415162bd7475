//! Order Summary
//!
//! The priced, tax-split, delivery-fee-adjusted view of a cart that the
//! checkout UI displays and the order flow persists. Amounts accumulate at
//! full precision during pricing and are rounded to two decimal places
//! exactly once, here, so rounding error never compounds.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{catalog::ProductId, tax::TaxSplit};

/// Errors assembling a summary from priced lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    /// A rounded amount no longer fits in minor units.
    #[error("monetary amount overflowed during summary assembly")]
    AmountOverflow,
}

/// A fully priced cart line, ready for assembly.
///
/// Subtotals are exact minor units; tax components are unrounded decimals in
/// minor units.
#[derive(Debug, Clone)]
pub(crate) struct PricedLine {
    pub product: ProductId,
    pub quantity: u32,
    pub unit_price_minor: i64,
    pub subtotal_minor: i64,
    pub offer_applied: Option<String>,
    pub gst_percent: Decimal,
    pub gst_minor: Decimal,
    pub split: TaxSplit,
    pub stock: u32,
}

/// Mutually exclusive GST components across the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    /// Central GST total.
    pub cgst: Decimal,

    /// State GST total.
    pub sgst: Decimal,

    /// Integrated GST total.
    pub igst: Decimal,
}

/// Per-line breakdown carried on the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    /// Catalog product reference.
    pub product_id: ProductId,

    /// Quantity the line was priced at, after stock and policy bounds.
    pub quantity: u32,

    /// Authoritative unit price.
    pub unit_price: Decimal,

    /// Offer-adjusted line subtotal.
    pub line_subtotal: Decimal,

    /// Name of the offer that reduced this line, if one did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_applied: Option<String>,

    /// GST rate applied to the line.
    pub gst_percent: Decimal,

    /// Line GST amount.
    pub gst_amount: Decimal,

    /// Central GST component.
    pub cgst: Decimal,

    /// State GST component.
    pub sgst: Decimal,

    /// Integrated GST component.
    pub igst: Decimal,

    /// Stock on record when the summary was computed.
    pub stock: u32,
}

/// The order summary consumed by the checkout UI and persisted, after
/// server-side recomputation, on the confirmed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Sum of offer-adjusted line subtotals.
    pub subtotal: Decimal,

    /// Sum of per-line GST amounts.
    pub tax: Decimal,

    /// GST components across the order.
    pub tax_breakdown: TaxBreakdown,

    /// Delivery fee for the post-filter cart.
    pub delivery_fee: Decimal,

    /// `subtotal + tax + delivery_fee`.
    pub total: Decimal,

    /// Per-line breakdown.
    pub items: Vec<LineSummary>,
}

/// Round an unrounded minor-unit amount to whole minor units.
fn round_minor(amount: Decimal) -> Result<i64, SummaryError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(SummaryError::AmountOverflow)
}

/// Present a minor-unit amount as a two-decimal major-unit value.
fn to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

impl OrderSummary {
    /// A summary with every amount at zero; what an empty normalized cart
    /// prices to.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            subtotal: to_major(0),
            tax: to_major(0),
            tax_breakdown: TaxBreakdown {
                cgst: to_major(0),
                sgst: to_major(0),
                igst: to_major(0),
            },
            delivery_fee: to_major(0),
            total: to_major(0),
            items: Vec::new(),
        }
    }

    /// Assemble a summary from priced lines and a delivery fee.
    ///
    /// Each line's GST is rounded here; the CGST half takes the rounded
    /// midpoint and SGST absorbs the remainder so the two halves always sum
    /// to the line's GST amount.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if a rounded amount overflows minor units.
    pub(crate) fn assemble(
        lines: &[PricedLine],
        delivery_fee_minor: i64,
    ) -> Result<Self, SummaryError> {
        if lines.is_empty() {
            return Ok(Self::empty());
        }

        let mut subtotal_minor: i64 = 0;
        let mut tax_minor: i64 = 0;
        let mut cgst_minor: i64 = 0;
        let mut sgst_minor: i64 = 0;
        let mut igst_minor: i64 = 0;
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let gst = round_minor(line.gst_minor)?;

            let (line_cgst, line_sgst, line_igst) = if line.split.igst.is_zero() {
                let cgst = round_minor(line.split.cgst)?;

                (cgst, gst - cgst, 0)
            } else {
                (0, 0, gst)
            };

            subtotal_minor += line.subtotal_minor;
            tax_minor += gst;
            cgst_minor += line_cgst;
            sgst_minor += line_sgst;
            igst_minor += line_igst;

            items.push(LineSummary {
                product_id: line.product.clone(),
                quantity: line.quantity,
                unit_price: to_major(line.unit_price_minor),
                line_subtotal: to_major(line.subtotal_minor),
                offer_applied: line.offer_applied.clone(),
                gst_percent: line.gst_percent,
                gst_amount: to_major(gst),
                cgst: to_major(line_cgst),
                sgst: to_major(line_sgst),
                igst: to_major(line_igst),
                stock: line.stock,
            });
        }

        Ok(Self {
            subtotal: to_major(subtotal_minor),
            tax: to_major(tax_minor),
            tax_breakdown: TaxBreakdown {
                cgst: to_major(cgst_minor),
                sgst: to_major(sgst_minor),
                igst: to_major(igst_minor),
            },
            delivery_fee: to_major(delivery_fee_minor),
            total: to_major(subtotal_minor + tax_minor + delivery_fee_minor),
            items,
        })
    }

    /// Render the summary as a terminal table for dry-run display.
    #[must_use]
    pub fn to_table(&self, currency: &Currency) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Subtotal", "GST", "CGST", "SGST", "IGST"]);

        for item in &self.items {
            builder.push_record([
                item.product_id.to_string(),
                item.quantity.to_string(),
                format_amount(item.line_subtotal, currency),
                format_amount(item.gst_amount, currency),
                format_amount(item.cgst, currency),
                format_amount(item.sgst, currency),
                format_amount(item.igst, currency),
            ]);
        }

        builder.push_record([
            "Delivery".to_string(),
            String::new(),
            format_amount(self.delivery_fee, currency),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);

        builder.push_record([
            "Total".to_string(),
            String::new(),
            format_amount(self.total, currency),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);

        let mut table = builder.build();
        table.with(Style::sharp());
        table.modify(Columns::new(1..), Alignment::right());

        table.to_string()
    }
}

/// Format a major-unit amount with its currency code.
fn format_amount(amount: Decimal, currency: &Currency) -> String {
    format!("{amount} {}", currency.iso_alpha_code)
}

/// Convert a rounded major-unit decimal back to exact minor units, for
/// callers that need to carry summary amounts as money.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the amount does not fit in minor units.
pub fn major_to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, SummaryError> {
    let minor = (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(SummaryError::AmountOverflow)?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::tax::{TaxJurisdiction, line_gst_minor, split_gst};

    use super::*;

    fn line(subtotal_minor: i64, gst_percent: i64, jurisdiction: TaxJurisdiction) -> PricedLine {
        let gst_minor = line_gst_minor(subtotal_minor, Decimal::from(gst_percent));

        PricedLine {
            product: ProductId::new("p-1"),
            quantity: 1,
            unit_price_minor: subtotal_minor,
            subtotal_minor,
            offer_applied: None,
            gst_percent: Decimal::from(gst_percent),
            gst_minor,
            split: split_gst(gst_minor, jurisdiction),
            stock: 7,
        }
    }

    #[test]
    fn empty_lines_assemble_to_zero_summary() -> TestResult {
        let summary = OrderSummary::assemble(&[], 4_900)?;

        assert_eq!(summary, OrderSummary::empty());
        assert_eq!(summary.total, Decimal::new(0, 2));

        Ok(())
    }

    #[test]
    fn total_is_subtotal_plus_tax_plus_fee() -> TestResult {
        let lines = [
            line(100_000, 5, TaxJurisdiction::InterState),
            line(50_000, 12, TaxJurisdiction::IntraState),
        ];

        let summary = OrderSummary::assemble(&lines, 4_900)?;

        assert_eq!(
            summary.total,
            summary.subtotal + summary.tax + summary.delivery_fee
        );
        assert_eq!(summary.subtotal, Decimal::new(150_000, 2));
        assert_eq!(summary.tax, Decimal::new(11_000, 2));
        assert_eq!(summary.total, Decimal::new(165_900, 2));

        Ok(())
    }

    #[test]
    fn sgst_absorbs_the_split_remainder() -> TestResult {
        // 18% of 175 minor units is 31.5: gst rounds to 32, the cgst half
        // (15.75) rounds to 16, sgst takes 32 - 16.
        let lines = [line(175, 18, TaxJurisdiction::IntraState)];

        let summary = OrderSummary::assemble(&lines, 0)?;
        let components: Vec<_> = summary
            .items
            .iter()
            .map(|item| (item.gst_amount, item.cgst + item.sgst, item.igst))
            .collect();

        assert_eq!(
            components,
            vec![(Decimal::new(32, 2), Decimal::new(32, 2), Decimal::new(0, 2))]
        );

        Ok(())
    }

    #[test]
    fn breakdown_totals_are_sums_of_line_components() -> TestResult {
        let lines = [
            line(100_000, 5, TaxJurisdiction::IntraState),
            line(60_000, 18, TaxJurisdiction::InterState),
        ];

        let summary = OrderSummary::assemble(&lines, 0)?;

        let cgst: Decimal = summary.items.iter().map(|i| i.cgst).sum();
        let sgst: Decimal = summary.items.iter().map(|i| i.sgst).sum();
        let igst: Decimal = summary.items.iter().map(|i| i.igst).sum();

        assert_eq!(summary.tax_breakdown.cgst, cgst);
        assert_eq!(summary.tax_breakdown.sgst, sgst);
        assert_eq!(summary.tax_breakdown.igst, igst);
        assert_eq!(summary.tax, cgst + sgst + igst);

        Ok(())
    }

    #[test]
    fn table_lists_lines_and_total() -> TestResult {
        let lines = [line(100_000, 5, TaxJurisdiction::InterState)];
        let summary = OrderSummary::assemble(&lines, 4_900)?;

        let table = summary.to_table(INR);

        assert!(table.contains("p-1"), "line row missing: {table}");
        assert!(table.contains("Total"), "total row missing: {table}");
        assert!(table.contains("1099.00 INR"), "total amount missing: {table}");

        Ok(())
    }

    #[test]
    fn major_to_money_round_trips_minor_units() -> TestResult {
        let money = major_to_money(Decimal::new(165_900, 2), INR)?;

        assert_eq!(money.to_minor_units(), 165_900);

        Ok(())
    }
}
