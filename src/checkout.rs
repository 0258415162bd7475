//! Checkout Service
//!
//! The seam between the pricing engine and its collaborators. The catalog
//! lookup hides any regional fan-out behind a single call, and the order
//! store owns persistence — including the atomic check-and-decrement of
//! stock that prevents overselling at confirmation. Quotes are dry runs;
//! placing an order re-prices the cart server-side so a tampered
//! client-echoed total can never be persisted.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::CartLine,
    catalog::{ProductId, ProductSnapshot, index_snapshots},
    delivery::DeliveryFeePolicy,
    destination::Destination,
    orders::{BuyerUuid, Order, ShippingAddress},
    pricing::{PricedCart, PricingError, price_cart},
    quantity::QuantityPolicy,
};

/// Catalog lookup failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not serve the lookup.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Order persistence failures.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// Stock changed between pricing and confirmation; the store's atomic
    /// check-and-decrement refused the write.
    #[error("insufficient stock for {0} at confirmation")]
    InsufficientStock(ProductId),

    /// The backing store could not persist the order.
    #[error("order store backend error: {0}")]
    Backend(String),
}

/// Authoritative product lookup for a pricing pass.
///
/// Implementations must return current stock and price, not cached-stale
/// values, and may fan out across regional databases internally — the
/// engine only ever sees this single call. Ids absent from the result are
/// treated as not found and dropped from the cart.
#[automock]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch snapshots for the given product ids.
    async fn snapshots(&self, ids: Vec<ProductId>) -> Result<Vec<ProductSnapshot>, CatalogError>;
}

/// Persistence sink for confirmed orders.
///
/// `insert` must atomically check and decrement stock per line item; a
/// plain read-then-write would oversell under concurrent confirmations.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a freshly placed order.
    async fn insert(&self, order: &Order) -> Result<(), OrderStoreError>;
}

/// Errors surfaced by checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Pricing the cart failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The catalog lookup failed.
    #[error("catalog lookup failed")]
    Catalog(#[source] CatalogError),

    /// Persisting the order failed.
    #[error("order could not be persisted")]
    Store(#[source] OrderStoreError),

    /// Every line was dropped during normalization; there is nothing to
    /// order.
    #[error("no deliverable items remain in the cart")]
    EmptyOrder,
}

/// Checkout operations over an injected catalog and order store.
#[derive(Debug)]
pub struct CheckoutService<C, S> {
    catalog: C,
    store: S,
    fee_policy: DeliveryFeePolicy,
    quantity_policy: QuantityPolicy,
}

impl<C, S> CheckoutService<C, S>
where
    C: CatalogProvider,
    S: OrderStore,
{
    /// Create a service over the given collaborators and policies.
    pub fn new(
        catalog: C,
        store: S,
        fee_policy: DeliveryFeePolicy,
        quantity_policy: QuantityPolicy,
    ) -> Self {
        Self {
            catalog,
            store,
            fee_policy,
            quantity_policy,
        }
    }

    /// Price a cart without creating an order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the catalog lookup or the pricing
    /// pass fails.
    pub async fn quote(
        &self,
        lines: &[CartLine],
        destination: &Destination,
    ) -> Result<PricedCart, CheckoutError> {
        let ids: Vec<ProductId> = lines.iter().map(|line| line.product.clone()).collect();

        let snapshots = self
            .catalog
            .snapshots(ids)
            .await
            .map_err(CheckoutError::Catalog)?;
        let catalog = index_snapshots(snapshots);

        let priced = price_cart(
            lines,
            &catalog,
            destination,
            &self.fee_policy,
            &self.quantity_policy,
        )?;

        debug!(
            items = priced.summary.items.len(),
            dropped = priced.dropped.len(),
            "quote computed"
        );

        Ok(priced)
    }

    /// Re-price the cart and persist a pending order.
    ///
    /// The summary is recomputed here from authoritative snapshots; any
    /// totals the client displayed are discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if pricing fails, normalization empties
    /// the cart, or the store rejects the write.
    pub async fn place_order(
        &self,
        buyer: BuyerUuid,
        lines: &[CartLine],
        destination: &Destination,
        address: ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        let priced = self.quote(lines, destination).await?;

        if priced.is_empty() {
            return Err(CheckoutError::EmptyOrder);
        }

        let order = Order::place(buyer, address, priced.summary);

        self.store
            .insert(&order)
            .await
            .map_err(CheckoutError::Store)?;

        info!(
            order = %order.number(),
            buyer = %buyer,
            total = %order.summary().total,
            "order placed"
        );

        Ok(order)
    }
}
