//! Pickboard Core - order pipeline for the pick dashboard.
//!
//! Turns raw store orders into display rows for the order list, the order
//! detail page and the printable warehouse pick list.
//!
//! # Architecture
//!
//! The core does no I/O. The one external call it can make, fetching a
//! customer record during name resolution, goes through the
//! [`identity::CustomerLookup`] trait supplied by the caller.
//!
//! # Modules
//!
//! - [`types`] - Lenient models of the order payload
//! - [`money`] - Money normalization
//! - [`identity`] - Customer display-name resolution
//! - [`shipping`] - Shipping method classification
//! - [`summary`] - Order list rows and the detail view
//! - [`picklist`] - Pick list rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod identity;
pub mod money;
pub mod picklist;
pub mod shipping;
pub mod summary;
pub mod types;

pub use identity::{CustomerCache, CustomerLookup, resolve_customer_name};
pub use money::to_money;
pub use picklist::{PickListSummary, PickRow, build_pick_rows};
pub use shipping::{ShippingClass, ShippingContext, ShippingPolicy, classify_shipping};
pub use summary::{OrderDetail, OrderSummaryRow, build_detail, build_summaries, build_summary};
pub use types::*;
