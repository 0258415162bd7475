//! Fixtures
//!
//! YAML-defined checkout scenarios (catalog, cart, destination and delivery
//! configuration) used by the integration tests. A scenario lives in
//! `fixtures/<set>/scenario.yaml` at the crate root.

use std::{fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::CartLine,
    catalog::{Catalog, index_snapshots},
    delivery::{DeliveryConfigError, DeliveryFeePolicy, FeeBasis},
    destination::Destination,
    fixtures::{carts::CartLineFixture, products::ProductsFixture},
};

pub mod carts;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown delivery fee basis
    #[error("Unknown delivery fee basis: {0}")]
    UnknownFeeBasis(String),

    /// Unsupported offer type
    #[error("Unsupported offer type: {0}")]
    UnsupportedOfferType(String),

    /// Delivery configuration failed validation
    #[error(transparent)]
    Delivery(#[from] DeliveryConfigError),
}

/// Raw destination section.
#[derive(Debug, Deserialize)]
struct DestinationFixture {
    country: String,
    state: Option<String>,
}

/// Raw delivery section.
#[derive(Debug, Deserialize)]
struct DeliveryFixture {
    flat_fee: String,
    free_threshold: Option<String>,
    basis: Option<String>,
}

/// Raw scenario file.
#[derive(Debug, Deserialize)]
struct ScenarioFixture {
    destination: DestinationFixture,
    delivery: DeliveryFixture,
    #[serde(flatten)]
    products: ProductsFixture,
    cart: Vec<CartLineFixture>,
}

/// A loaded checkout scenario.
#[derive(Debug)]
pub struct Fixture {
    catalog: Catalog,
    cart: Vec<CartLine>,
    destination: Destination,
    delivery: DeliveryFeePolicy,
}

impl Fixture {
    /// Load a scenario set from `fixtures/<set>/scenario.yaml`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or any section
    /// fails to parse or validate.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(set)
            .join("scenario.yaml");

        let raw = fs::read_to_string(path)?;
        let scenario: ScenarioFixture = serde_norway::from_str(&raw)?;

        let destination = Destination::new(
            scenario.destination.country,
            scenario.destination.state,
        );

        let flat_fee = parse_money(&scenario.delivery.flat_fee)?;
        let free_threshold = scenario
            .delivery
            .free_threshold
            .as_deref()
            .map(parse_money)
            .transpose()?;
        let basis = match scenario.delivery.basis.as_deref() {
            None | Some("per-order") => FeeBasis::PerOrder,
            Some("per-shipment") => FeeBasis::PerShipment,
            Some(other) => return Err(FixtureError::UnknownFeeBasis(other.to_string())),
        };
        let delivery = DeliveryFeePolicy::new(flat_fee, free_threshold, basis)?;

        let catalog = index_snapshots(scenario.products.into_snapshots()?);

        let cart = scenario
            .cart
            .into_iter()
            .map(CartLineFixture::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            cart,
            destination,
            delivery,
        })
    }

    /// The catalog snapshots, indexed by product id.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The submitted cart lines.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// The delivery destination.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The delivery fee policy.
    #[must_use]
    pub fn delivery(&self) -> &DeliveryFeePolicy {
        &self.delivery
    }
}

/// Parse a money string (e.g., "499.00 INR") into [`rusty_money::Money`].
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// the amount cannot be parsed, or the currency code is unknown.
pub fn parse_money(
    s: &str,
) -> Result<rusty_money::Money<'static, rusty_money::iso::Currency>, FixtureError> {
    let (minor, currency) = products::parse_price(s)?;

    Ok(rusty_money::Money::from_minor(minor, currency))
}
