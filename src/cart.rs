//! Cart Lines
//!
//! Client-supplied cart state. Lines are ephemeral and revalidated against
//! the catalog on every pricing pass; nothing here is trusted beyond the
//! product reference, the requested quantity and the attached offer.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{catalog::ProductId, offers::Offer};

/// Validation failures on raw cart input.
///
/// These abort the pricing pass outright; they are client errors, not cart
/// composition outcomes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line arrived without a product reference.
    #[error("cart line {0} has no product reference")]
    MissingProductRef(usize),

    /// A line requested a quantity of zero.
    ///
    /// Removal is a distinct cart operation; a zero quantity at pricing time
    /// is rejected rather than silently raised to one.
    #[error("cart line {0} ({1}) requested a quantity of zero")]
    ZeroQuantity(usize, ProductId),
}

/// A single client-supplied cart line.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Reference to the catalog product.
    pub product: ProductId,

    /// Requested quantity; bounded later by stock and the quantity policy.
    pub quantity: u32,

    /// Offer attached to this line, if any. At most one offer applies per
    /// line and the attached one wins; the engine never searches for a
    /// better one.
    pub offer: Option<Offer>,
}

impl CartLine {
    /// Create a line with no offer attached.
    pub fn new(product: ProductId, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            offer: None,
        }
    }

    /// Attach an offer to the line.
    #[must_use]
    pub fn with_offer(mut self, offer: Offer) -> Self {
        self.offer = Some(offer);
        self
    }
}

/// Validate raw cart lines before normalization.
///
/// # Errors
///
/// Returns a [`CartError`] for the first blank product reference or
/// zero-quantity line, with its index in the submitted cart.
pub fn validate_lines(lines: &[CartLine]) -> Result<(), CartError> {
    for (index, line) in lines.iter().enumerate() {
        if line.product.is_empty() {
            return Err(CartError::MissingProductRef(index));
        }

        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity(index, line.product.clone()));
        }
    }

    Ok(())
}

/// Why a line was removed from the cart during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    /// The referenced product is absent from the catalog.
    NotFound,

    /// The product cannot ship to the destination state.
    NotDeliverable,

    /// The product has no stock left.
    OutOfStock,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NotFound => f.write_str("not found"),
            DropReason::NotDeliverable => f.write_str("not deliverable"),
            DropReason::OutOfStock => f.write_str("out of stock"),
        }
    }
}

/// A line removed from the cart, reported alongside the summary so the
/// caller can tell the buyer rather than silently shrinking the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedLine {
    /// The product reference from the submitted line.
    pub product: ProductId,

    /// Why the line was dropped.
    pub reason: DropReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_lines() {
        let lines = [
            CartLine::new(ProductId::new("p-1"), 1),
            CartLine::new(ProductId::new("p-2"), 3),
        ];

        assert_eq!(validate_lines(&lines), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_product_ref() {
        let lines = [
            CartLine::new(ProductId::new("p-1"), 1),
            CartLine::new(ProductId::new(""), 1),
        ];

        assert_eq!(validate_lines(&lines), Err(CartError::MissingProductRef(1)));
    }

    #[test]
    fn validate_rejects_zero_quantity() {
        let lines = [CartLine::new(ProductId::new("p-1"), 0)];

        assert_eq!(
            validate_lines(&lines),
            Err(CartError::ZeroQuantity(0, ProductId::new("p-1")))
        );
    }

    #[test]
    fn drop_reason_display_is_human_readable() {
        assert_eq!(DropReason::OutOfStock.to_string(), "out of stock");
        assert_eq!(DropReason::NotDeliverable.to_string(), "not deliverable");
    }
}
