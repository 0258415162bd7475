//! End-to-end checkout flow over in-memory collaborators

use std::sync::Mutex;

use async_trait::async_trait;
use mandi::{
    cart::CartLine,
    catalog::{ProductId, ProductSnapshot, Seller, SellerId},
    checkout::{CatalogError, CatalogProvider, CheckoutService, OrderStore, OrderStoreError},
    delivery::{DeliveryFeePolicy, FeeBasis},
    destination::Destination,
    orders::{BuyerUuid, Order, OrderStatus, ShippingAddress},
    quantity::QuantityPolicy,
};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::INR};
use testresult::TestResult;

/// Catalog backed by a fixed list of snapshots.
#[derive(Debug, Default)]
struct InMemoryCatalog {
    snapshots: Vec<ProductSnapshot>,
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn snapshots(&self, ids: Vec<ProductId>) -> Result<Vec<ProductSnapshot>, CatalogError> {
        Ok(self
            .snapshots
            .iter()
            .filter(|snapshot| ids.contains(&snapshot.id))
            .cloned()
            .collect())
    }
}

/// Order store that records inserted orders.
#[derive(Debug, Default)]
struct InMemoryStore {
    orders: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), OrderStoreError> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|_poisoned| OrderStoreError::Backend("store lock poisoned".to_string()))?;

        orders.push(order.clone());

        Ok(())
    }
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog {
        snapshots: vec![
            ProductSnapshot {
                id: ProductId::new("p-chai"),
                name: "Darjeeling Tea".to_string(),
                category: Some("beverages".to_string()),
                price: Money::from_minor(24_000, INR),
                stock: 20,
                gst_percent: Decimal::from(5),
                admin_owned: false,
                seller: Some(Seller {
                    id: SellerId::new("seller-djx"),
                    gst_registered: Some(true),
                    state: Some("WB".to_string()),
                }),
            },
            ProductSnapshot {
                id: ProductId::new("p-saree"),
                name: "Tant Saree".to_string(),
                category: Some("clothing".to_string()),
                price: Money::from_minor(120_000, INR),
                stock: 4,
                gst_percent: Decimal::from(12),
                admin_owned: false,
                seller: Some(Seller {
                    id: SellerId::new("seller-kol"),
                    gst_registered: Some(false),
                    state: Some("WB".to_string()),
                }),
            },
        ],
    }
}

fn service(store: InMemoryStore) -> TestResult<CheckoutService<InMemoryCatalog, InMemoryStore>> {
    let fee_policy = DeliveryFeePolicy::new(
        Money::from_minor(4_900, INR),
        Some(Money::from_minor(99_900, INR)),
        FeeBasis::PerOrder,
    )?;

    Ok(CheckoutService::new(
        catalog(),
        store,
        fee_policy,
        QuantityPolicy::default(),
    ))
}

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

#[tokio::test]
async fn quote_then_place_order_prices_identically() -> TestResult {
    let service = service(InMemoryStore::default())?;
    let destination = Destination::domestic("WB");
    let lines = [
        CartLine::new(ProductId::new("p-chai"), 2),
        CartLine::new(ProductId::new("p-saree"), 1),
    ];

    let quoted = service.quote(&lines, &destination).await?;
    let order = service
        .place_order(BuyerUuid::new(), &lines, &destination, address())
        .await?;

    // Confirmation re-prices server-side; with unchanged snapshots the two
    // passes must agree to the paisa.
    assert_eq!(order.summary(), &quoted.summary);
    assert_eq!(order.status(), OrderStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn placed_order_walks_the_lifecycle() -> TestResult {
    let service = service(InMemoryStore::default())?;
    let destination = Destination::domestic("WB");
    let lines = [CartLine::new(ProductId::new("p-chai"), 1)];

    let mut order = service
        .place_order(BuyerUuid::new(), &lines, &destination, address())
        .await?;

    order.transition(OrderStatus::Confirmed)?;
    order.transition(OrderStatus::Delivered)?;
    order.transition(OrderStatus::Completed)?;

    assert!(order.status().is_terminal());

    Ok(())
}

#[tokio::test]
async fn ineligible_only_cart_never_reaches_the_store() -> TestResult {
    let service = service(InMemoryStore::default())?;

    // The saree seller is unregistered and based in WB; an MH buyer cannot
    // order it.
    let destination = Destination::domestic("MH");
    let lines = [CartLine::new(ProductId::new("p-saree"), 1)];

    let result = service
        .place_order(BuyerUuid::new(), &lines, &destination, address())
        .await;

    assert!(result.is_err(), "an empty normalized cart must not persist");

    Ok(())
}

#[tokio::test]
async fn unknown_destination_state_prices_but_flags_igst() -> TestResult {
    let service = service(InMemoryStore::default())?;
    let destination = Destination::domestic_unknown_state();
    let lines = [CartLine::new(ProductId::new("p-chai"), 1)];

    let quoted = service.quote(&lines, &destination).await?;

    // The registered seller still ships, but with the buyer state unknown
    // the tax lands on the never-under-collecting IGST branch.
    assert_eq!(quoted.summary.tax_breakdown.cgst, Decimal::new(0, 2));
    assert_eq!(quoted.summary.tax_breakdown.igst, quoted.summary.tax);

    Ok(())
}
