//! Product Catalog Snapshots
//!
//! Authoritative product records loaded once per pricing pass. Prices, stock
//! and tax rates always come from here; amounts echoed by a client are never
//! trusted.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque catalog identifier for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from an opaque string reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier for a third-party seller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(String);

impl SellerId {
    /// Create a seller id from an opaque string reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seller attributes carried on a product snapshot.
///
/// `gst_registered` is `None` when the seller's tax registration status is
/// unknown; eligibility treats unknown the same as unregistered.
#[derive(Debug, Clone)]
pub struct Seller {
    /// Seller identity, used to count distinct shipments.
    pub id: SellerId,

    /// Whether the seller holds a GST registration.
    pub gst_registered: Option<bool>,

    /// The seller's home state code.
    pub state: Option<String>,
}

/// Data-integrity failures on a product snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Unit price below zero.
    #[error("product {0} has a negative unit price")]
    NegativePrice(ProductId),

    /// GST rate outside the 0–100 range.
    #[error("product {0} has a GST rate outside 0-100: {1}")]
    GstRateOutOfRange(ProductId, Decimal),
}

/// Authoritative product record at pricing time.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name, used for keyword-scoped offers.
    pub name: String,

    /// Category slug, used for category-scoped offers.
    pub category: Option<String>,

    /// Current unit price.
    pub price: Money<'static, Currency>,

    /// Units currently in stock.
    pub stock: u32,

    /// GST rate as a percentage in `0..=100`.
    pub gst_percent: Decimal,

    /// First-party inventory owned by the platform.
    pub admin_owned: bool,

    /// Seller attributes; `None` for first-party inventory or when the
    /// listing record carries no seller data.
    pub seller: Option<Seller>,
}

impl ProductSnapshot {
    /// Assert the monetary invariants the pricing engine relies on.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when the unit price is negative or the GST
    /// rate falls outside `0..=100`. These are upstream data-integrity
    /// failures; pricing fails fast rather than producing a nonsensical
    /// total.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.price.to_minor_units() < 0 {
            return Err(SnapshotError::NegativePrice(self.id.clone()));
        }

        if self.gst_percent < Decimal::ZERO || self.gst_percent > Decimal::ONE_HUNDRED {
            return Err(SnapshotError::GstRateOutOfRange(
                self.id.clone(),
                self.gst_percent,
            ));
        }

        Ok(())
    }

    /// The seller's home state, if known.
    #[must_use]
    pub fn seller_state(&self) -> Option<&str> {
        self.seller.as_ref().and_then(|s| s.state.as_deref())
    }

    /// The seller's GST registration status, if known.
    #[must_use]
    pub fn seller_gst_registered(&self) -> Option<bool> {
        self.seller.as_ref().and_then(|s| s.gst_registered)
    }
}

/// Snapshots keyed by product id, as consumed by a pricing pass.
pub type Catalog = FxHashMap<ProductId, ProductSnapshot>;

/// Index a list of snapshots by product id.
pub fn index_snapshots(snapshots: impl IntoIterator<Item = ProductSnapshot>) -> Catalog {
    snapshots
        .into_iter()
        .map(|snapshot| (snapshot.id.clone(), snapshot))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn snapshot(price_minor: i64, gst: Decimal) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new("p-1"),
            name: "Masala Chai".to_string(),
            category: Some("beverages".to_string()),
            price: Money::from_minor(price_minor, INR),
            stock: 10,
            gst_percent: gst,
            admin_owned: false,
            seller: Some(Seller {
                id: SellerId::new("s-1"),
                gst_registered: Some(true),
                state: Some("WB".to_string()),
            }),
        }
    }

    #[test]
    fn validate_accepts_in_range_snapshot() -> TestResult {
        snapshot(24_000, Decimal::from(5)).validate()?;

        Ok(())
    }

    #[test]
    fn validate_rejects_negative_price() {
        let result = snapshot(-1, Decimal::from(5)).validate();

        assert!(matches!(result, Err(SnapshotError::NegativePrice(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_gst() {
        let low = snapshot(100, Decimal::from(-1)).validate();
        let high = snapshot(100, Decimal::from(101)).validate();

        assert!(matches!(low, Err(SnapshotError::GstRateOutOfRange(..))));
        assert!(matches!(high, Err(SnapshotError::GstRateOutOfRange(..))));
    }

    #[test]
    fn index_snapshots_keys_by_id() {
        let catalog = index_snapshots([snapshot(100, Decimal::from(5))]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_key(&ProductId::new("p-1")));
    }

    #[test]
    fn blank_product_ref_is_empty() {
        assert!(ProductId::new("  ").is_empty());
        assert!(!ProductId::new("p-2").is_empty());
    }
}
