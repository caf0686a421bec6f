//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to /orders
//! GET  /health                  - Liveness check (plain text)
//! GET  /healthz                 - Liveness check (JSON)
//!
//! # Orders (read from Shopify)
//! GET  /orders?shop=            - Paid, unfulfilled orders
//! GET  /orders/{id}?shop=       - Order detail
//!
//! # Pick list
//! GET  /picklijsten?shop=       - Printable pick list
//! ```
//!
//! Every page takes an optional `shop` key; without it the default shop is
//! used, and an unknown key is a 404.

pub mod orders;
pub mod picklists;

use axum::{Json, Router, response::Redirect, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::AppError, shopify::ShopifyClient, state::AppState};

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/picklijsten", get(picklists::index))
}

/// `?shop=` query parameter shared by all pages.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub shop: Option<String>,
}

/// The shop a request is for.
#[derive(Debug)]
pub struct SelectedShop {
    pub key: String,
    pub client: ShopifyClient,
}

impl ShopQuery {
    /// Resolve the requested shop, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for a shop key that is not configured.
    pub fn select(&self, state: &AppState) -> Result<SelectedShop, AppError> {
        let key = self
            .shop
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| state.default_shop());

        state
            .shop(key)
            .map(|client| SelectedShop {
                key: key.to_string(),
                client: client.clone(),
            })
            .ok_or_else(|| AppError::NotFound("unknown shop".to_string()))
    }
}

async fn index() -> Redirect {
    Redirect::temporary("/orders")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Shopify.
async fn health() -> &'static str {
    "ok"
}

/// Liveness health check endpoint for uptime monitors expecting JSON.
async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use pickboard_core::shipping::ShippingPolicy;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::PickNameField;

    fn test_state() -> AppState {
        // Nothing here talks to Shopify, so the address is never dialed.
        let client = ShopifyClient::with_base_url(
            "http://127.0.0.1:9/admin/api/2025-07",
            SecretString::from("shpat_test"),
            PickNameField::default(),
        )
        .unwrap();
        AppState::from_parts(
            [("abc-led".to_string(), client)],
            "abc-led",
            ShippingPolicy::default(),
            50,
        )
    }

    async fn get(uri: &str) -> axum::response::Response {
        routes()
            .with_state(test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_orders() {
        let response = get("/").await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/orders");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        assert_eq!(get("/health").await.status(), StatusCode::OK);

        let response = get("/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.as_ref(), br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_unknown_shop_is_not_found() {
        assert_eq!(
            get("/orders?shop=nope").await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get("/picklijsten?shop=nope").await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get("/orders/1?shop=nope").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_blank_shop_uses_default() {
        let state = test_state();
        let query = ShopQuery {
            shop: Some("  ".to_string()),
        };

        assert_eq!(query.select(&state).unwrap().key, "abc-led");
        assert_eq!(ShopQuery::default().select(&state).unwrap().key, "abc-led");
    }
}
