//! Delivery Fee
//!
//! Fee computation over the post-filter cart. The threshold and fee amounts
//! are configuration handed in by the caller — the engine never embeds them,
//! and a missing configuration is a loud integration error rather than a
//! silent zero fee.

use clap::ValueEnum;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors constructing a delivery fee policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryConfigError {
    /// The flat fee is negative.
    #[error("delivery flat fee must not be negative")]
    NegativeFee,

    /// The free-delivery threshold is negative.
    #[error("free-delivery threshold must not be negative")]
    NegativeThreshold,

    /// Fee and threshold are denominated in different currencies.
    #[error("delivery fee and threshold currencies differ: {0} vs {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Whether the flat fee is charged once per order or once per distinct
/// shipment (one shipment per distinct seller; first-party stock ships as a
/// single warehouse shipment).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FeeBasis {
    /// One flat fee for the whole order.
    #[default]
    PerOrder,

    /// The flat fee multiplied by the number of distinct shipments.
    PerShipment,
}

/// Caller-supplied delivery fee configuration.
#[derive(Debug, Clone)]
pub struct DeliveryFeePolicy {
    flat_fee: Money<'static, Currency>,
    free_threshold: Option<Money<'static, Currency>>,
    basis: FeeBasis,
}

impl DeliveryFeePolicy {
    /// Build a validated policy.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryConfigError`] when an amount is negative or the
    /// fee and threshold currencies differ.
    pub fn new(
        flat_fee: Money<'static, Currency>,
        free_threshold: Option<Money<'static, Currency>>,
        basis: FeeBasis,
    ) -> Result<Self, DeliveryConfigError> {
        if flat_fee.to_minor_units() < 0 {
            return Err(DeliveryConfigError::NegativeFee);
        }

        if let Some(threshold) = free_threshold {
            if threshold.to_minor_units() < 0 {
                return Err(DeliveryConfigError::NegativeThreshold);
            }

            if threshold.currency() != flat_fee.currency() {
                return Err(DeliveryConfigError::CurrencyMismatch(
                    flat_fee.currency().iso_alpha_code,
                    threshold.currency().iso_alpha_code,
                ));
            }
        }

        Ok(Self {
            flat_fee,
            free_threshold,
            basis,
        })
    }

    /// The currency the policy is denominated in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.flat_fee.currency()
    }

    /// Fee in minor units for a cart with the given post-filter subtotal and
    /// number of distinct shipments. An empty cart (zero shipments) carries
    /// no fee.
    #[must_use]
    pub fn fee_minor(&self, subtotal_minor: i64, shipments: usize) -> i64 {
        if shipments == 0 {
            return 0;
        }

        if let Some(threshold) = self.free_threshold {
            if subtotal_minor >= threshold.to_minor_units() {
                return 0;
            }
        }

        let multiplier = match self.basis {
            FeeBasis::PerOrder => 1,
            FeeBasis::PerShipment => i64::try_from(shipments).unwrap_or(i64::MAX),
        };

        self.flat_fee.to_minor_units().saturating_mul(multiplier)
    }
}
