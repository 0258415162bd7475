//! Cart Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    cart::CartLine,
    catalog::ProductId,
    fixtures::{FixtureError, products::parse_price},
    offers::{Offer, OfferRule, OfferScope, OfferThreshold, Reduction},
};

/// A cart line in YAML.
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key into the scenario's catalog
    pub product: String,

    /// Requested quantity
    pub quantity: u32,

    /// Offer attached to the line
    pub offer: Option<OfferFixture>,
}

/// An offer in YAML.
///
/// `kind` is one of `percent`, `flat` or `pack`. Percent offers carry their
/// percentage in `value`; flat offers a money string; pack offers a money
/// string plus `min_units`.
#[derive(Debug, Deserialize)]
pub struct OfferFixture {
    /// Offer name
    pub name: String,

    /// Offer kind: percent, flat or pack
    pub kind: String,

    /// Percentage (e.g., 10) or money string (e.g., "50 INR")
    pub value: String,

    /// Minimum units for pack offers and quantity thresholds
    pub min_units: Option<u32>,

    /// Subtotal threshold for discount offers
    pub min_subtotal: Option<String>,

    /// Category scope
    pub category: Option<String>,
}

impl CartLineFixture {
    /// Convert into an engine cart line.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the attached offer fails to parse.
    pub fn into_line(self) -> Result<CartLine, FixtureError> {
        let mut line = CartLine::new(ProductId::new(self.product), self.quantity);

        if let Some(offer) = self.offer {
            line = line.with_offer(offer.into_offer()?);
        }

        Ok(line)
    }
}

impl OfferFixture {
    fn threshold(&self) -> Result<OfferThreshold, FixtureError> {
        if let Some(min_subtotal) = self.min_subtotal.as_deref() {
            let (minor, currency) = parse_price(min_subtotal)?;

            return Ok(OfferThreshold::Subtotal(rusty_money::Money::from_minor(
                minor, currency,
            )));
        }

        // A one-unit quantity threshold is always met.
        Ok(OfferThreshold::Quantity(self.min_units.unwrap_or(1)))
    }

    fn into_offer(self) -> Result<Offer, FixtureError> {
        let rule = match self.kind.as_str() {
            "percent" => {
                let percent = self
                    .value
                    .parse::<Decimal>()
                    .map_err(|_err| FixtureError::InvalidPercentage(self.value.clone()))?;

                OfferRule::DiscountMin {
                    threshold: self.threshold()?,
                    reduction: Reduction::Percent(Percentage::from(
                        percent / Decimal::ONE_HUNDRED,
                    )),
                }
            }
            "flat" => {
                let (minor, currency) = parse_price(&self.value)?;

                OfferRule::DiscountMin {
                    threshold: self.threshold()?,
                    reduction: Reduction::Flat(rusty_money::Money::from_minor(minor, currency)),
                }
            }
            "pack" => {
                let (minor, currency) = parse_price(&self.value)?;

                OfferRule::PackMin {
                    min_units: self.min_units.unwrap_or(1),
                    unit_price: rusty_money::Money::from_minor(minor, currency),
                }
            }
            other => return Err(FixtureError::UnsupportedOfferType(other.to_string())),
        };

        let mut offer = Offer::new(self.name, rule);

        if let Some(category) = self.category {
            offer = offer.scoped(OfferScope::Category(category));
        }

        Ok(offer)
    }
}
