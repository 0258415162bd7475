//! Delivery Eligibility
//!
//! Gates which products may ship to a destination state. Sellers without a
//! GST registration may only ship within their own state, so the default is
//! conservative: when seller attributes or the destination state are missing
//! and the product is neither first-party nor GST-registered, it is not
//! deliverable.

use rustc_hash::FxHashMap;

use crate::catalog::{ProductId, ProductSnapshot};

/// Whether a single product may ship to the given destination state.
///
/// Rules in order, first match wins:
/// 1. First-party inventory is always deliverable.
/// 2. A GST-registered seller ships to any state.
/// 3. A known destination state matching the seller's state exactly
///    (case-sensitive; callers normalise casing upstream).
/// 4. Otherwise not deliverable.
#[must_use]
pub fn deliverable(product: &ProductSnapshot, destination_state: Option<&str>) -> bool {
    if product.admin_owned {
        return true;
    }

    if product.seller_gst_registered() == Some(true) {
        return true;
    }

    match (destination_state, product.seller_state()) {
        (Some(destination), Some(seller)) if !destination.is_empty() => destination == seller,
        _ => false,
    }
}

/// Evaluate eligibility for every supplied product.
///
/// Total over its input: every product maps to exactly one boolean, so the
/// cart UI can flag non-shippable items without special cases. Products
/// missing from the catalog are a pricing concern and never reach this map.
pub fn check_eligibility<'a>(
    destination_state: Option<&str>,
    products: impl IntoIterator<Item = &'a ProductSnapshot>,
) -> FxHashMap<ProductId, bool> {
    products
        .into_iter()
        .map(|product| {
            (
                product.id.clone(),
                deliverable(product, destination_state),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::INR};

    use crate::catalog::{Seller, SellerId};

    use super::*;

    fn product(admin: bool, gst: Option<bool>, state: Option<&str>) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new("p-1"),
            name: "Steel Bottle".to_string(),
            category: None,
            price: Money::from_minor(50_000, INR),
            stock: 5,
            gst_percent: Decimal::from(12),
            admin_owned: admin,
            seller: state.map(|s| Seller {
                id: SellerId::new("s-1"),
                gst_registered: gst,
                state: Some(s.to_string()),
            }),
        }
    }

    #[test]
    fn admin_products_ship_anywhere() {
        let p = product(true, None, None);

        assert!(deliverable(&p, Some("MH")));
        assert!(deliverable(&p, None));
    }

    #[test]
    fn gst_registered_sellers_ship_across_states() {
        let p = product(false, Some(true), Some("WB"));

        assert!(deliverable(&p, Some("MH")));
        assert!(deliverable(&p, None));
    }

    #[test]
    fn unregistered_sellers_ship_only_within_their_state() {
        let p = product(false, Some(false), Some("WB"));

        assert!(deliverable(&p, Some("WB")));
        assert!(!deliverable(&p, Some("MH")));
    }

    #[test]
    fn state_match_is_case_sensitive() {
        let p = product(false, None, Some("WB"));

        assert!(!deliverable(&p, Some("wb")));
    }

    #[test]
    fn unknown_destination_state_fails_closed() {
        let p = product(false, Some(false), Some("WB"));

        assert!(!deliverable(&p, None));
        assert!(!deliverable(&p, Some("")));
    }

    #[test]
    fn missing_seller_attributes_fail_closed() {
        let p = product(false, None, None);

        assert!(!deliverable(&p, Some("WB")));
    }

    #[test]
    fn unknown_registration_status_counts_as_unregistered() {
        let p = product(false, None, Some("WB"));

        assert!(deliverable(&p, Some("WB")));
        assert!(!deliverable(&p, Some("MH")));
    }

    #[test]
    fn check_eligibility_is_total_over_input() {
        let mut a = product(true, None, None);
        a.id = ProductId::new("p-a");
        let mut b = product(false, Some(false), Some("WB"));
        b.id = ProductId::new("p-b");
        let products = [a, b];

        let map = check_eligibility(Some("MH"), &products);

        assert_eq!(map.len(), products.len());
        assert_eq!(map.get(&ProductId::new("p-a")), Some(&true));
        assert_eq!(map.get(&ProductId::new("p-b")), Some(&false));
    }
}
