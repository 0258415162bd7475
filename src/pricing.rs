//! Pricing Engine
//!
//! Converts a validated cart into an order summary: eligibility filters the
//! cart, the quantity policy bounds requested quantities, and the engine
//! computes money amounts from the filtered, bounded cart. Pure per pass —
//! snapshots are read once up front and nothing is re-fetched mid-flight, so
//! concurrent dry runs share no mutable state.

#[cfg(test)]
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::MoneyError;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{CartError, CartLine, DropReason, DroppedLine, validate_lines},
    catalog::{Catalog, ProductId, SnapshotError},
    delivery::DeliveryFeePolicy,
    destination::Destination,
    eligibility::deliverable,
    offers::OfferError,
    quantity::{QuantityAdjustment, QuantityPolicy},
    summary::{OrderSummary, PricedLine, SummaryError},
    tax::{jurisdiction, line_gst_minor, split_gst},
};

/// Errors that abort a pricing pass.
///
/// Dropped lines are not errors; they travel on the [`PricedCart`] so the
/// caller can inform the buyer while still showing a total for what
/// survived.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Client-side validation failure on the raw cart.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A catalog snapshot violated a monetary invariant.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// A product is priced in a different currency than the delivery fee
    /// policy (and therefore the pass).
    #[error("product {0} is priced in {1}, but the pass uses {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Offer application failed.
    #[error(transparent)]
    Offer(#[from] OfferError),

    /// Money arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// An amount overflowed during accumulation or assembly.
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// The result of a pricing pass: the summary plus everything that was
/// removed or adjusted along the way.
#[derive(Debug, Clone)]
pub struct PricedCart {
    /// The assembled order summary.
    pub summary: OrderSummary,

    /// Lines removed during normalization, with reasons.
    pub dropped: SmallVec<[DroppedLine; 4]>,

    /// Lines whose quantity was reduced by stock or the quantity policy.
    pub adjustments: SmallVec<[QuantityAdjustment; 4]>,
}

impl PricedCart {
    /// Whether normalization removed every line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.items.is_empty()
    }
}

/// Price a cart against catalog snapshots for a destination.
///
/// Normalization order per line: catalog lookup, delivery eligibility,
/// stock, then the quantity policy. Lines that fall out are reported on the
/// result, never silently folded into the totals. An empty normalized cart
/// prices to an all-zero summary — whether that blocks checkout is the
/// caller's decision.
///
/// # Errors
///
/// Returns a [`PricingError`] on invalid raw input, a data-integrity
/// violation in a snapshot, a currency mismatch, or failed money
/// arithmetic.
pub fn price_cart(
    lines: &[CartLine],
    catalog: &Catalog,
    destination: &Destination,
    fee_policy: &DeliveryFeePolicy,
    quantity_policy: &QuantityPolicy,
) -> Result<PricedCart, PricingError> {
    validate_lines(lines)?;

    let currency = fee_policy.currency();
    let mut priced: Vec<PricedLine> = Vec::with_capacity(lines.len());
    let mut dropped: SmallVec<[DroppedLine; 4]> = SmallVec::new();
    let mut adjustments: SmallVec<[QuantityAdjustment; 4]> = SmallVec::new();
    let mut shipments: FxHashSet<Option<String>> = FxHashSet::default();

    for line in lines {
        let Some(product) = catalog.get(&line.product) else {
            debug!(product = %line.product, "dropping line: not in catalog");
            dropped.push(DroppedLine {
                product: line.product.clone(),
                reason: DropReason::NotFound,
            });
            continue;
        };

        product.validate()?;

        if product.price.currency() != currency {
            return Err(PricingError::CurrencyMismatch(
                product.id.clone(),
                product.price.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if !deliverable(product, destination.state()) {
            debug!(product = %product.id, "dropping line: not deliverable");
            dropped.push(DroppedLine {
                product: line.product.clone(),
                reason: DropReason::NotDeliverable,
            });
            continue;
        }

        if product.stock == 0 {
            debug!(product = %product.id, "dropping line: out of stock");
            dropped.push(DroppedLine {
                product: line.product.clone(),
                reason: DropReason::OutOfStock,
            });
            continue;
        }

        let in_stock = line.quantity.min(product.stock);
        let quantity = quantity_policy.clamp(&product.price, in_stock);

        if quantity != line.quantity {
            debug!(
                product = %product.id,
                requested = line.quantity,
                granted = quantity,
                "quantity bounded by stock or policy"
            );
            adjustments.push(QuantityAdjustment {
                product: line.product.clone(),
                requested: line.quantity,
                granted: quantity,
            });
        }

        let unit_minor = product.price.to_minor_units();
        let base_minor = unit_minor
            .checked_mul(i64::from(quantity))
            .ok_or(SummaryError::AmountOverflow)?;

        let (subtotal_minor, offer_applied) = match &line.offer {
            Some(offer) => {
                let adjusted = offer.adjusted_subtotal_minor(base_minor, quantity, product)?;
                let applied = (adjusted != base_minor).then(|| offer.name.clone());

                (adjusted, applied)
            }
            None => (base_minor, None),
        };

        let gst_minor = line_gst_minor(subtotal_minor, product.gst_percent);
        let split = split_gst(gst_minor, jurisdiction(destination, product.seller_state()));

        shipments.insert(product.seller.as_ref().map(|s| s.id.as_str().to_string()));

        priced.push(PricedLine {
            product: product.id.clone(),
            quantity,
            unit_price_minor: unit_minor,
            subtotal_minor,
            offer_applied,
            gst_percent: product.gst_percent,
            gst_minor,
            split,
            stock: product.stock,
        });
    }

    let subtotal_minor: i64 = priced.iter().map(|line| line.subtotal_minor).sum();
    let fee_minor = fee_policy.fee_minor(subtotal_minor, shipments.len());

    let summary = OrderSummary::assemble(&priced, fee_minor)?;

    debug!(
        lines = priced.len(),
        dropped = dropped.len(),
        total = %summary.total,
        "cart priced"
    );

    Ok(PricedCart {
        summary,
        dropped,
        adjustments,
    })
}
