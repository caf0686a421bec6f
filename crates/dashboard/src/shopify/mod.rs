//! Shopify Admin API adapter.
//!
//! Reads paid, unfulfilled orders over the REST Admin API and enriches them
//! with the pick name metafield through one GraphQL `nodes` query. The
//! access token only needs `read_orders` and `read_customers`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pickboard_dashboard::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shop, config.pick_name.clone())?;
//!
//! // Orders with pick names attached
//! let orders = client.fetch_orders(50).await?;
//!
//! // A single order, `None` if it does not exist
//! let order = client.fetch_order("450789469").await?;
//! ```

mod client;

pub use client::ShopifyClient;

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
