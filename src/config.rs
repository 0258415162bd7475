//! Engine Configuration
//!
//! Delivery-fee settings loaded from CLI flags or the environment. Designed
//! to be `#[command(flatten)]`-ed into a host binary's own configuration;
//! the host converts it into a validated [`DeliveryFeePolicy`] before any
//! pricing pass runs. A missing fee amount fails parsing loudly — the
//! engine never guesses a fee.

use clap::Parser;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::delivery::{DeliveryConfigError, DeliveryFeePolicy, FeeBasis};

/// Errors converting raw settings into a fee policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An amount cannot be represented in minor units.
    #[error("amount not representable in minor units: {0}")]
    InvalidAmount(Decimal),

    /// The converted amounts failed policy validation.
    #[error(transparent)]
    Delivery(#[from] DeliveryConfigError),
}

/// Delivery-fee settings for the pricing engine.
#[derive(Debug, Parser)]
pub struct EngineSettings {
    /// Flat delivery fee in rupees.
    #[arg(long = "delivery-flat-fee", env = "MANDI_DELIVERY_FLAT_FEE")]
    pub delivery_flat_fee: Decimal,

    /// Subtotal at or above which delivery is free, in rupees.
    #[arg(long = "free-delivery-threshold", env = "MANDI_FREE_DELIVERY_THRESHOLD")]
    pub free_delivery_threshold: Option<Decimal>,

    /// Charge the flat fee once per order or once per distinct shipment.
    #[arg(
        long = "delivery-fee-basis",
        env = "MANDI_DELIVERY_FEE_BASIS",
        value_enum,
        default_value_t = FeeBasis::PerOrder
    )]
    pub delivery_fee_basis: FeeBasis,
}

impl EngineSettings {
    /// Load settings from the environment and process arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] when required settings are missing or
    /// unparseable.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env if present; ignore when missing.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Convert the raw settings into a validated fee policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an amount cannot be represented in
    /// minor units or fails policy validation.
    pub fn fee_policy(&self) -> Result<DeliveryFeePolicy, ConfigError> {
        let flat_fee = Money::from_minor(to_minor(self.delivery_flat_fee)?, iso::INR);

        let free_threshold = self
            .free_delivery_threshold
            .map(|amount| Ok::<_, ConfigError>(Money::from_minor(to_minor(amount)?, iso::INR)))
            .transpose()?;

        Ok(DeliveryFeePolicy::new(
            flat_fee,
            free_threshold,
            self.delivery_fee_basis,
        )?)
    }
}

/// Convert a rupee amount to minor units, rounding to the nearest paisa.
fn to_minor(amount: Decimal) -> Result<i64, ConfigError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(ConfigError::InvalidAmount(amount))
}
