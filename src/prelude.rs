//! Mandi prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartLine, DropReason, DroppedLine},
    catalog::{Catalog, ProductId, ProductSnapshot, Seller, SellerId, SnapshotError, index_snapshots},
    checkout::{
        CatalogError, CatalogProvider, CheckoutError, CheckoutService, OrderStore, OrderStoreError,
    },
    config::{ConfigError, EngineSettings},
    delivery::{DeliveryConfigError, DeliveryFeePolicy, FeeBasis},
    destination::Destination,
    eligibility::{check_eligibility, deliverable},
    offers::{Offer, OfferError, OfferRule, OfferScope, OfferThreshold, Reduction},
    orders::{
        Buyer, BuyerUuid, Order, OrderError, OrderNumber, OrderStatus, OrderUuid, ShippingAddress,
    },
    pricing::{PricedCart, PricingError, price_cart},
    quantity::{QuantityAdjustment, QuantityPolicy, QuantityTier},
    summary::{LineSummary, OrderSummary, SummaryError, TaxBreakdown},
    tax::{TaxJurisdiction, TaxSplit, jurisdiction, line_gst_minor, split_gst},
    uuids::TypedUuid,
};
