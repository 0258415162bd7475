//! Quantity Policy
//!
//! Tiered per-line quantity caps that discourage bulk arbitrage on
//! high-value items. The tiers are data supplied at construction, not
//! constants baked into call sites.

use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::catalog::ProductId;

/// Errors constructing or applying a quantity policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// A tier allows zero units, which would empty every cart line.
    #[error("quantity tier caps must be at least one unit")]
    ZeroCap,

    /// Tier price bounds must strictly increase.
    #[error("quantity tier bounds must strictly increase")]
    UnorderedTiers,
}

/// A cap applied to unit prices strictly below `below_minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityTier {
    /// Upper price bound in minor units, exclusive.
    pub below_minor: i64,

    /// Maximum units per line within this tier.
    pub cap: u32,
}

/// Per-line quantity caps keyed by unit price tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityPolicy {
    tiers: SmallVec<[QuantityTier; 3]>,
    top_cap: u32,
}

impl QuantityPolicy {
    /// Build a policy from ascending price tiers plus the cap for prices at
    /// or above the last bound.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if any cap is zero or the tier bounds are
    /// not strictly increasing.
    pub fn new(
        tiers: impl Into<SmallVec<[QuantityTier; 3]>>,
        top_cap: u32,
    ) -> Result<Self, QuantityError> {
        let tiers = tiers.into();

        if top_cap == 0 || tiers.iter().any(|tier| tier.cap == 0) {
            return Err(QuantityError::ZeroCap);
        }

        let ordered = tiers
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.below_minor < b.below_minor));

        if !ordered {
            return Err(QuantityError::UnorderedTiers);
        }

        Ok(Self { tiers, top_cap })
    }

    /// The maximum quantity a single line may carry at the given unit price.
    #[must_use]
    pub fn max_quantity(&self, unit_price: &Money<'_, Currency>) -> u32 {
        let minor = unit_price.to_minor_units();

        self.tiers
            .iter()
            .find(|tier| minor < tier.below_minor)
            .map_or(self.top_cap, |tier| tier.cap)
    }

    /// Bound a requested quantity to `[1, cap]` for the given unit price.
    ///
    /// Zero requests never reach this point; they are rejected upstream as a
    /// [`crate::cart::CartError::ZeroQuantity`] validation failure.
    #[must_use]
    pub fn clamp(&self, unit_price: &Money<'_, Currency>, requested: u32) -> u32 {
        requested.clamp(1, self.max_quantity(unit_price))
    }
}

impl Default for QuantityPolicy {
    /// Storefront defaults: under ₹1000 → 3 units, under ₹2000 → 2 units,
    /// ₹2000 and above → 1 unit.
    fn default() -> Self {
        Self {
            tiers: smallvec![
                QuantityTier {
                    below_minor: 100_000,
                    cap: 3,
                },
                QuantityTier {
                    below_minor: 200_000,
                    cap: 2,
                },
            ],
            top_cap: 1,
        }
    }
}

/// A clamp applied to a cart line, reported for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityAdjustment {
    /// The product whose line was adjusted.
    pub product: ProductId,

    /// Quantity the client asked for.
    pub requested: u32,

    /// Quantity the line was priced at.
    pub granted: u32,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use super::*;

    fn rupees(amount: i64) -> Money<'static, Currency> {
        Money::from_minor(amount * 100, INR)
    }

    #[test]
    fn default_tiers_match_storefront_caps() {
        let policy = QuantityPolicy::default();

        assert_eq!(policy.max_quantity(&rupees(500)), 3);
        assert_eq!(policy.max_quantity(&rupees(999)), 3);
        assert_eq!(policy.max_quantity(&rupees(1000)), 2);
        assert_eq!(policy.max_quantity(&rupees(1999)), 2);
        assert_eq!(policy.max_quantity(&rupees(2000)), 1);
        assert_eq!(policy.max_quantity(&rupees(2500)), 1);
    }

    #[test]
    fn clamp_bounds_high_requests() {
        let policy = QuantityPolicy::default();

        assert_eq!(policy.clamp(&rupees(2500), 5), 1);
        assert_eq!(policy.clamp(&rupees(500), 2), 2);
    }

    #[test]
    fn clamp_is_idempotent() {
        let policy = QuantityPolicy::default();

        for requested in 1..=10 {
            let once = policy.clamp(&rupees(1500), requested);
            let twice = policy.clamp(&rupees(1500), once);

            assert_eq!(once, twice, "clamping twice must equal clamping once");
        }
    }

    #[test]
    fn new_rejects_zero_caps() {
        let result = QuantityPolicy::new(
            smallvec![QuantityTier {
                below_minor: 100,
                cap: 0,
            }],
            1,
        );

        assert_eq!(result, Err(QuantityError::ZeroCap));
        assert_eq!(QuantityPolicy::new(smallvec![], 0), Err(QuantityError::ZeroCap));
    }

    #[test]
    fn new_rejects_unordered_tiers() {
        let result = QuantityPolicy::new(
            smallvec![
                QuantityTier {
                    below_minor: 200,
                    cap: 3,
                },
                QuantityTier {
                    below_minor: 100,
                    cap: 2,
                },
            ],
            1,
        );

        assert_eq!(result, Err(QuantityError::UnorderedTiers));
    }
}
