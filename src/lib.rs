//! Mandi
//!
//! Mandi is the order pricing core of a multi-tenant storefront: it turns a
//! client cart into a priced, GST-split, delivery-fee-adjusted order
//! summary, gated by per-state delivery eligibility and tiered quantity
//! caps. Pricing always runs against authoritative catalog snapshots, and
//! the checkout service re-prices server-side at confirmation so a
//! client-echoed total is never trusted.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod delivery;
pub mod destination;
pub mod eligibility;
pub mod fixtures;
pub mod offers;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod quantity;
pub mod summary;
pub mod tax;
pub mod uuids;
