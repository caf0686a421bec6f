//! REST + GraphQL client for one Shopify store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pickboard_core::identity::CustomerLookup;
use pickboard_core::types::{Customer, Order};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::instrument;

use crate::config::{PickNameField, ShopConfig};

use super::{GraphQLError, ShopifyError};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Shopify's default `Retry-After` for REST throttling.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;
/// `nodes(ids:)` accepts at most this many IDs.
const MAX_NODES_PER_QUERY: usize = 250;
const ORDER_GID_PREFIX: &str = "gid://shopify/Order/";

const PICK_NAMES_QUERY: &str = r"
query PickNames($ids: [ID!]!, $namespace: String!, $key: String!) {
  nodes(ids: $ids) {
    ... on Order {
      legacyResourceId
      metafield(namespace: $namespace, key: $key) {
        value
      }
    }
  }
}";

/// Shopify Admin API client for one store.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
    pick_name: PickNameField,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("base_url", &self.inner.base_url)
            .field("pick_name", &self.inner.pick_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Debug, Deserialize)]
struct CustomerEnvelope {
    customer: Customer,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PickNamesData {
    #[serde(default)]
    nodes: Vec<Option<PickNameNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickNameNode {
    legacy_resource_id: Option<String>,
    metafield: Option<Metafield>,
}

#[derive(Debug, Deserialize)]
struct Metafield {
    value: Option<String>,
}

impl ShopifyClient {
    /// Create a client for a configured shop.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopConfig, pick_name: PickNameField) -> Result<Self, ShopifyError> {
        Self::with_base_url(config.api_base_url(), config.access_token.clone(), pick_name)
    }

    /// Create a client against an explicit API base URL
    /// (`https://{shop}/admin/api/{version}` in production).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: SecretString,
        pick_name: PickNameField,
    ) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                access_token,
                pick_name,
            }),
        })
    }

    /// The API base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// GET a REST resource. A 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ShopifyError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = check_status(response)?.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Execute a GraphQL query.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(self.url("graphql.json"))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let body = check_status(response)?.bytes().await?;
        let graphql_response: GraphQLResponse<T> = serde_json::from_slice(&body)?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        graphql_response.data.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // REST
    // =========================================================================

    /// List paid, unfulfilled orders (any open/closed status).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, limit: u16) -> Result<Vec<Order>, ShopifyError> {
        let query = [
            ("status", "any".to_string()),
            ("financial_status", "paid".to_string()),
            ("fulfillment_status", "unfulfilled".to_string()),
            ("limit", limit.to_string()),
        ];

        let envelope: OrdersEnvelope = self
            .get_json("orders.json", &query)
            .await?
            .ok_or_else(|| ShopifyError::NotFound("orders endpoint".to_string()))?;

        tracing::debug!(count = envelope.orders.len(), "Fetched orders");
        Ok(envelope.orders)
    }

    /// Get one order by numeric ID. Unknown IDs are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>, ShopifyError> {
        if !is_numeric_id(order_id) {
            return Ok(None);
        }
        let envelope: Option<OrderEnvelope> = self
            .get_json(&format!("orders/{order_id}.json"), &[])
            .await?;
        Ok(envelope.map(|e| e.order))
    }

    /// Get one customer by numeric ID. Unknown IDs are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, ShopifyError> {
        if !is_numeric_id(customer_id) {
            return Ok(None);
        }
        let envelope: Option<CustomerEnvelope> = self
            .get_json(&format!("customers/{customer_id}.json"), &[])
            .await?;
        Ok(envelope.map(|e| e.customer))
    }

    // =========================================================================
    // GraphQL
    // =========================================================================

    /// Look up the pick name metafield for a batch of orders.
    ///
    /// Returns order ID to value; orders without a (non-blank) value are
    /// left out.
    ///
    /// # Errors
    ///
    /// Returns an error if any batch query fails.
    #[instrument(skip_all, fields(count = order_ids.len()))]
    pub async fn fetch_pick_names<S: AsRef<str>>(
        &self,
        order_ids: &[S],
    ) -> Result<HashMap<String, String>, ShopifyError> {
        let gids: Vec<String> = order_ids
            .iter()
            .filter_map(|id| {
                let id: &str = id.as_ref();
                is_numeric_id(id).then(|| format!("{ORDER_GID_PREFIX}{id}"))
            })
            .collect();

        let mut names = HashMap::new();
        for chunk in gids.chunks(MAX_NODES_PER_QUERY) {
            let data: PickNamesData = self
                .graphql(
                    PICK_NAMES_QUERY,
                    json!({
                        "ids": chunk,
                        "namespace": self.inner.pick_name.namespace,
                        "key": self.inner.pick_name.key,
                    }),
                )
                .await?;

            for node in data.nodes.into_iter().flatten() {
                if let Some(id) = node.legacy_resource_id
                    && let Some(value) = node.metafield.and_then(|m| m.value)
                    && !value.trim().is_empty()
                {
                    names.insert(id, value.trim().to_string());
                }
            }
        }

        Ok(names)
    }

    // =========================================================================
    // Enriched fetches
    // =========================================================================

    /// List orders with pick names attached.
    ///
    /// The pick name lookup is best-effort: on failure the orders are
    /// returned without it.
    ///
    /// # Errors
    ///
    /// Returns an error only if listing the orders fails.
    pub async fn fetch_orders(&self, limit: u16) -> Result<Vec<Order>, ShopifyError> {
        let mut orders = self.list_orders(limit).await?;
        self.attach_pick_names(&mut orders).await;
        Ok(orders)
    }

    /// Get one order with its pick name attached (best-effort).
    ///
    /// # Errors
    ///
    /// Returns an error only if fetching the order fails.
    pub async fn fetch_order(&self, order_id: &str) -> Result<Option<Order>, ShopifyError> {
        let Some(mut order) = self.get_order(order_id).await? else {
            return Ok(None);
        };
        self.attach_pick_names(std::slice::from_mut(&mut order)).await;
        Ok(Some(order))
    }

    async fn attach_pick_names(&self, orders: &mut [Order]) {
        let ids: Vec<&str> = orders.iter().filter_map(|o| o.id.as_deref()).collect();
        if ids.is_empty() {
            return;
        }

        match self.fetch_pick_names(&ids).await {
            Ok(names) => {
                for order in orders.iter_mut() {
                    order.pick_name = order.id.as_ref().and_then(|id| names.get(id)).cloned();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Pick name lookup failed, continuing without");
            }
        }
    }
}

impl CustomerLookup for ShopifyClient {
    type Error = ShopifyError;

    async fn fetch_customer(&self, customer_id: &str) -> Result<Option<Customer>, Self::Error> {
        self.get_customer(customer_id).await
    }
}

/// Map non-success statuses to errors.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ShopifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Err(ShopifyError::RateLimited(retry_after))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ShopifyError::Unauthorized(
            format!("access token rejected ({status})"),
        )),
        _ => Err(ShopifyError::UnexpectedStatus(status.as_u16())),
    }
}

/// Whole seconds from a `Retry-After` value like `2.0`.
fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().split('.').next()?.parse().ok()
}

/// Shopify REST IDs are plain integers.
fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
