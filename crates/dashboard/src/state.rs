//! Application state shared across handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use pickboard_core::shipping::ShippingPolicy;

use crate::{
    config::DashboardConfig,
    shopify::{ShopifyClient, ShopifyError},
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    shops: BTreeMap<String, ShopifyClient>,
    default_shop: String,
    shipping: ShippingPolicy,
    fetch_limit: u16,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be created.
    pub fn new(config: &DashboardConfig) -> Result<Self, ShopifyError> {
        let client = ShopifyClient::new(&config.shop, config.pick_name.clone())?;
        Ok(Self::from_parts(
            [(config.shop.key.clone(), client)],
            &config.shop.key,
            config.shipping.clone(),
            config.fetch_limit,
        ))
    }

    /// Build state from ready-made clients keyed by shop key.
    #[must_use]
    pub fn from_parts(
        shops: impl IntoIterator<Item = (String, ShopifyClient)>,
        default_shop: &str,
        shipping: ShippingPolicy,
        fetch_limit: u16,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                shops: shops.into_iter().collect(),
                default_shop: default_shop.to_string(),
                shipping,
                fetch_limit,
            }),
        }
    }

    /// Client for a shop key, if configured.
    #[must_use]
    pub fn shop(&self, key: &str) -> Option<&ShopifyClient> {
        self.inner.shops.get(key)
    }

    /// Configured shop keys, sorted.
    pub fn shop_keys(&self) -> impl Iterator<Item = &str> {
        self.inner.shops.keys().map(String::as_str)
    }

    /// Shop used when a request does not name one.
    #[must_use]
    pub fn default_shop(&self) -> &str {
        &self.inner.default_shop
    }

    /// Shipping classification rules.
    #[must_use]
    pub fn shipping(&self) -> &ShippingPolicy {
        &self.inner.shipping
    }

    /// Orders fetched per page load.
    #[must_use]
    pub fn fetch_limit(&self) -> u16 {
        self.inner.fetch_limit
    }
}
