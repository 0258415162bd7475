//! Offers
//!
//! Named promotional rules attachable to a cart line. At most one offer
//! applies per line; the one attached to the line wins and offers never
//! stack. An offer whose threshold is unmet or whose scope the product does
//! not match leaves the line at its base price — that is a quiet outcome,
//! not an error.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::catalog::ProductSnapshot;

/// Errors specific to offer application.
#[derive(Debug, Error)]
pub enum OfferError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How a qualifying `DiscountMin` offer reduces the line subtotal.
#[derive(Debug, Clone, Copy)]
pub enum Reduction {
    /// Take this percentage off the line subtotal.
    Percent(Percentage),

    /// Take this flat amount off the line subtotal.
    Flat(Money<'static, Currency>),
}

/// What a line must reach before a `DiscountMin` offer kicks in.
#[derive(Debug, Clone, Copy)]
pub enum OfferThreshold {
    /// Base line subtotal at or above this amount.
    Subtotal(Money<'static, Currency>),

    /// At least this many units on the line.
    Quantity(u32),
}

/// Which products an offer is declared for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferScope {
    /// Applies to any product it is attached to.
    Any,

    /// Applies only to products in this category.
    Category(String),

    /// Applies only to products whose name contains this keyword,
    /// case-insensitively.
    Keyword(String),
}

/// The promotional rule behind an offer.
#[derive(Debug, Clone)]
pub enum OfferRule {
    /// Percentage or flat reduction once a subtotal/quantity threshold is
    /// met.
    DiscountMin {
        /// Gate the reduction behind this threshold.
        threshold: OfferThreshold,

        /// Reduction applied once the threshold is met.
        reduction: Reduction,
    },

    /// Reduced per-unit price when buying at least `min_units`.
    PackMin {
        /// Minimum units on the line for the pack price to apply.
        min_units: u32,

        /// Per-unit price once the pack size is reached.
        unit_price: Money<'static, Currency>,
    },
}

/// A named promotional rule attached to a cart line.
#[derive(Debug, Clone)]
pub struct Offer {
    /// Offer name, echoed on the line breakdown when it applied.
    pub name: String,

    /// The rule to evaluate at pricing time.
    pub rule: OfferRule,

    /// Products the offer is declared for.
    pub scope: OfferScope,
}

impl Offer {
    /// Create an offer applying to whatever line it is attached to.
    pub fn new(name: impl Into<String>, rule: OfferRule) -> Self {
        Self {
            name: name.into(),
            rule,
            scope: OfferScope::Any,
        }
    }

    /// Restrict the offer to a declared scope.
    #[must_use]
    pub fn scoped(mut self, scope: OfferScope) -> Self {
        self.scope = scope;
        self
    }

    /// Whether the product matches the offer's declared scope.
    #[must_use]
    pub fn applies_to(&self, product: &ProductSnapshot) -> bool {
        match &self.scope {
            OfferScope::Any => true,
            OfferScope::Category(category) => {
                product.category.as_deref() == Some(category.as_str())
            }
            OfferScope::Keyword(keyword) => product
                .name
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
        }
    }

    /// Apply the offer to a base line subtotal, returning the adjusted
    /// subtotal in minor units. Reductions floor at zero; an unmet threshold
    /// or unmatched scope returns the base subtotal unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if a percentage cannot be safely
    /// represented in minor units or money arithmetic fails.
    pub fn adjusted_subtotal_minor(
        &self,
        base_minor: i64,
        quantity: u32,
        product: &ProductSnapshot,
    ) -> Result<i64, OfferError> {
        if !self.applies_to(product) {
            return Ok(base_minor);
        }

        let adjusted = match &self.rule {
            OfferRule::DiscountMin {
                threshold,
                reduction,
            } => {
                let met = match threshold {
                    OfferThreshold::Subtotal(min) => base_minor >= min.to_minor_units(),
                    OfferThreshold::Quantity(min) => quantity >= *min,
                };

                if !met {
                    return Ok(base_minor);
                }

                match reduction {
                    Reduction::Percent(percent) => base_minor
                        .checked_sub(percent_of_minor(*percent, base_minor)?)
                        .ok_or(OfferError::PercentConversion)?,
                    Reduction::Flat(amount) => base_minor
                        .checked_sub(amount.to_minor_units())
                        .ok_or(OfferError::PercentConversion)?,
                }
            }
            OfferRule::PackMin {
                min_units,
                unit_price,
            } => {
                if quantity < *min_units {
                    return Ok(base_minor);
                }

                unit_price
                    .to_minor_units()
                    .checked_mul(i64::from(quantity))
                    .ok_or(OfferError::PercentConversion)?
            }
        };

        Ok(adjusted.max(0))
    }
}

/// Calculate a percentage of a minor-unit amount, rounded midpoint away from
/// zero.
pub(crate) fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, OfferError> {
    let applied = percent * Decimal::from(minor);
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(OfferError::PercentConversion)
}
