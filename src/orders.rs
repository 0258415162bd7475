//! Orders
//!
//! The immutable snapshot persisted at checkout confirmation, and its status
//! lifecycle. The summary stored here is always recomputed server-side just
//! before the order is placed; a client-echoed summary is never persisted.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use thiserror::Error;

use crate::{summary::OrderSummary, uuids::TypedUuid};

/// Marker for buyer identities.
#[derive(Debug)]
pub struct Buyer;

/// Buyer UUID.
pub type BuyerUuid = TypedUuid<Buyer>;

/// Order UUID.
pub type OrderUuid = TypedUuid<Order>;

/// Errors mutating an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The order is in a terminal state and accepts no further transitions.
    #[error("order {number} is final in state {status}")]
    Terminal {
        /// The order's human-readable number.
        number: OrderNumber,

        /// The terminal status the order is in.
        status: OrderStatus,
    },

    /// The requested transition is not part of the lifecycle.
    #[error("cannot move an order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },
}

/// Where an order sits in its lifecycle.
///
/// Forward path: `Pending → Confirmed → Delivered → Completed`. Branches:
/// pending or confirmed orders may be `Cancelled`; delivered orders may be
/// `Returned`, and returned orders `Refunded`. `Completed`, `Cancelled` and
/// `Refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created at checkout, payment not yet verified.
    Pending,

    /// Payment verified.
    Confirmed,

    /// Shipment delivered to the buyer.
    Delivered,

    /// Buyer acknowledged receipt; the order is closed.
    Completed,

    /// Cancelled before delivery.
    Cancelled,

    /// Sent back by the buyer after delivery.
    Returned,

    /// Refund issued for a returned order.
    Refunded,
}

impl OrderStatus {
    /// Whether the status accepts no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Delivered | Self::Cancelled)
                | (Self::Delivered, Self::Completed | Self::Returned)
                | (Self::Returned, Self::Refunded)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Refunded => "refunded",
        };

        f.write_str(label)
    }
}

/// Unique human-readable order number, derived from the order's UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Derive a number from an order identity, e.g. `OD-9F0C2A1B`.
    #[must_use]
    pub fn derive(uuid: OrderUuid) -> Self {
        let simple = uuid.into_uuid().simple().to_string();
        let short: String = simple.chars().take(8).collect();

        Self(format!("OD-{}", short.to_uppercase()))
    }

    /// The number as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipping address captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient full name.
    pub recipient: String,

    /// Street address.
    pub line1: String,

    /// Additional address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// City.
    pub city: String,

    /// State code, normalised the same way as the pricing destination.
    pub state: String,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,
}

/// An order as persisted at confirmation.
#[derive(Debug, Clone)]
pub struct Order {
    uuid: OrderUuid,
    number: OrderNumber,
    buyer: BuyerUuid,
    address: ShippingAddress,
    summary: OrderSummary,
    status: OrderStatus,
    placed_at: Timestamp,
}

impl Order {
    /// Create a pending order from a freshly recomputed summary.
    #[must_use]
    pub fn place(buyer: BuyerUuid, address: ShippingAddress, summary: OrderSummary) -> Self {
        let uuid = OrderUuid::new();

        Self {
            uuid,
            number: OrderNumber::derive(uuid),
            buyer,
            address,
            summary,
            status: OrderStatus::Pending,
            placed_at: Timestamp::now(),
        }
    }

    /// The order identity.
    #[must_use]
    pub fn uuid(&self) -> OrderUuid {
        self.uuid
    }

    /// The human-readable order number.
    #[must_use]
    pub fn number(&self) -> &OrderNumber {
        &self.number
    }

    /// The buyer who placed the order.
    #[must_use]
    pub fn buyer(&self) -> BuyerUuid {
        self.buyer
    }

    /// The delivery address captured at confirmation.
    #[must_use]
    pub fn address(&self) -> &ShippingAddress {
        &self.address
    }

    /// The priced summary frozen into the order.
    #[must_use]
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// The current lifecycle status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// When the order was placed.
    #[must_use]
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Move the order along its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the order is already terminal or the
    /// transition is not part of the lifecycle.
    pub fn transition(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::Terminal {
                number: self.number.clone(),
                status: self.status,
            });
        }

        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: "A. Sharma".to_string(),
            line1: "14 Hill Cart Road".to_string(),
            line2: None,
            city: "Siliguri".to_string(),
            state: "WB".to_string(),
            postal_code: "734001".to_string(),
            country: "India".to_string(),
        }
    }

    fn pending_order() -> Order {
        Order::place(BuyerUuid::new(), address(), OrderSummary::empty())
    }

    #[test]
    fn placed_orders_start_pending() {
        let order = pending_order();

        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.number().as_str().starts_with("OD-"));
    }

    #[test]
    fn order_numbers_are_distinct_per_order() {
        let a = pending_order();
        let b = pending_order();

        assert_ne!(a.number(), b.number());
    }

    #[test]
    fn happy_path_reaches_completed() {
        let mut order = pending_order();

        assert_eq!(order.transition(OrderStatus::Confirmed), Ok(()));
        assert_eq!(order.transition(OrderStatus::Delivered), Ok(()));
        assert_eq!(order.transition(OrderStatus::Completed), Ok(()));
        assert!(order.status().is_terminal());
    }

    #[test]
    fn return_path_reaches_refunded() {
        let mut order = pending_order();

        assert_eq!(order.transition(OrderStatus::Confirmed), Ok(()));
        assert_eq!(order.transition(OrderStatus::Delivered), Ok(()));
        assert_eq!(order.transition(OrderStatus::Returned), Ok(()));
        assert_eq!(order.transition(OrderStatus::Refunded), Ok(()));
        assert!(order.status().is_terminal());
    }

    #[test]
    fn skipping_states_is_rejected() {
        let mut order = pending_order();

        let result = order.transition(OrderStatus::Delivered);

        assert_eq!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered,
            })
        );
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn terminal_orders_reject_all_transitions() {
        let mut order = pending_order();

        assert_eq!(order.transition(OrderStatus::Cancelled), Ok(()));

        let result = order.transition(OrderStatus::Confirmed);

        assert!(matches!(result, Err(OrderError::Terminal { .. })));
    }

    #[test]
    fn cancelling_after_confirmation_is_allowed() {
        let mut order = pending_order();

        assert_eq!(order.transition(OrderStatus::Confirmed), Ok(()));
        assert_eq!(order.transition(OrderStatus::Cancelled), Ok(()));
    }
}
