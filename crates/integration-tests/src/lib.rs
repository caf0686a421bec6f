//! Integration tests for the pickboard dashboard.
//!
//! Everything runs against a `wiremock` stand-in for the Shopify Admin API,
//! so no credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pickboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopify_client` - REST/GraphQL adapter behavior and error mapping
//! - `dashboard_routes` - Rendered pages through the full router

use pickboard_core::shipping::ShippingPolicy;
use pickboard_dashboard::{config::PickNameField, shopify::ShopifyClient, state::AppState};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Access token the mock server expects.
pub const TEST_TOKEN: &str = "shpat_4b1f9e07c2d38a65e0f71b9c";

/// Shop key the test state is configured with.
pub const TEST_SHOP: &str = "abc-led";

/// Client pointed at a mock server.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client_for(server: &MockServer) -> ShopifyClient {
    ShopifyClient::with_base_url(
        server.uri(),
        SecretString::from(TEST_TOKEN),
        PickNameField::default(),
    )
    .unwrap_or_else(|e| panic!("failed to build test ShopifyClient: {e}"))
}

/// Application state with a single shop backed by the mock server.
#[must_use]
pub fn state_for(server: &MockServer) -> AppState {
    AppState::from_parts(
        [(TEST_SHOP.to_string(), client_for(server))],
        TEST_SHOP,
        ShippingPolicy::default(),
        50,
    )
}

/// `orders.json` body.
#[must_use]
pub fn orders_body(orders: &[Value]) -> Value {
    json!({ "orders": orders })
}

/// GraphQL `nodes` body carrying pick names, `(order id, value)`.
#[must_use]
pub fn pick_names_body(names: &[(&str, Option<&str>)]) -> Value {
    let nodes: Vec<Value> = names
        .iter()
        .map(|(id, value)| {
            json!({
                "legacyResourceId": id,
                "metafield": value.map(|v| json!({ "value": v })),
            })
        })
        .collect();
    json!({ "data": { "nodes": nodes } })
}

/// Order `#1001`: one Lamp (qty 2), shipped as "Pakket Belgie", customer
/// with a name.
#[must_use]
pub fn lamp_order() -> Value {
    json!({
        "id": 1001,
        "name": "#1001",
        "created_at": "2026-10-14T09:12:00+02:00",
        "currency": "EUR",
        "total_price": "26.93",
        "subtotal_price": "19.98",
        "total_tax": "4.67",
        "financial_status": "paid",
        "fulfillment_status": null,
        "customer": {"id": 501, "first_name": "Jane", "last_name": "Doe"},
        "shipping_lines": [{"title": "Pakket Belgie", "price": "6.95"}],
        "line_items": [{"title": "Lamp", "quantity": 2, "price": "9.99", "sku": "L1"}]
    })
}

/// Order `#1000`: one Cable, picked up in store, customer referenced by ID
/// only.
#[must_use]
pub fn cable_order() -> Value {
    json!({
        "id": 1000,
        "name": "#1000",
        "created_at": "2026-10-14T08:40:00+02:00",
        "currency": "EUR",
        "total_price": "4.50",
        "financial_status": "paid",
        "customer": {"id": 42},
        "shipping_lines": [{"title": "Afhalen in de winkel", "price": "0.00"}],
        "line_items": [{"title": "Cable", "quantity": 1, "price": "4.50"}]
    })
}
