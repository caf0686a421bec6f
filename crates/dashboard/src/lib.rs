//! Pickboard dashboard library.
//!
//! Order list, order detail and printable pick list for a Shopify store,
//! served with axum and askama. Exposed as a library so the router can be
//! driven from tests.
//!
//! # Security
//!
//! Holds a Shopify Admin API token with read access to orders and
//! customers. The dashboard has no login of its own; bind it to a private
//! interface or put it behind an authenticating proxy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod routes;
pub mod shopify;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;

use state::AppState;

/// Full application router with static assets mounted at `/static`.
pub fn app(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
