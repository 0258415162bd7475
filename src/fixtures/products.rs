//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{
    catalog::{ProductId, ProductSnapshot, Seller, SellerId},
    fixtures::FixtureError,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

impl ProductsFixture {
    /// Convert every fixture entry into a catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if any price fails to parse.
    pub fn into_snapshots(self) -> Result<Vec<ProductSnapshot>, FixtureError> {
        self.products
            .into_iter()
            .map(|(key, fixture)| fixture.into_snapshot(&key))
            .collect()
    }
}

/// Seller attributes in YAML.
#[derive(Debug, Deserialize)]
pub struct SellerFixture {
    /// Seller key
    pub id: String,

    /// GST registration status; absent means unknown
    pub gst_registered: Option<bool>,

    /// Seller home state code
    pub state: Option<String>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Category slug
    pub category: Option<String>,

    /// Product price (e.g., "499.00 INR")
    pub price: String,

    /// Units in stock
    pub stock: u32,

    /// GST rate percentage
    pub gst_percent: Decimal,

    /// First-party inventory
    #[serde(default)]
    pub admin: bool,

    /// Seller attributes for marketplace listings
    pub seller: Option<SellerFixture>,
}

impl ProductFixture {
    fn into_snapshot(self, key: &str) -> Result<ProductSnapshot, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        Ok(ProductSnapshot {
            id: ProductId::new(key),
            name: self.name,
            category: self.category,
            price: Money::from_minor(minor_units, currency),
            stock: self.stock,
            gst_percent: self.gst_percent,
            admin_owned: self.admin,
            seller: self.seller.map(|seller| Seller {
                id: SellerId::new(seller.id),
                gst_registered: seller.gst_registered,
                state: seller.state,
            }),
        })
    }
}

/// Parse price string (e.g., "2.99 INR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = iso::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((minor_units, currency))
}
