//! Raw order-source records.
//!
//! These mirror the Shopify REST Admin API payloads closely enough to
//! deserialize them directly, with every field optional.

pub mod customer;
pub(crate) mod lenient;
pub mod order;

pub use customer::{Address, Customer};
pub use order::{Fulfillment, LineItem, Order, PLACEHOLDER, ShippingLine};
