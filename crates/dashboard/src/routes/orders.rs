//! Order list and order detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use pickboard_core::summary::{
    OrderDetail, OrderSummaryRow, build_detail_with_lookup, build_summaries,
};
use tracing::instrument;

use crate::{error::AppError, filters, state::AppState};

use super::ShopQuery;

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub shop: String,
    pub shop_keys: Vec<String>,
    pub active_page: &'static str,
    pub orders: Vec<OrderSummaryRow>,
    /// Set when Shopify could not be reached; the page shows a banner.
    pub load_error: bool,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub shop: String,
    pub shop_keys: Vec<String>,
    pub active_page: &'static str,
    pub order: OrderDetail,
}

/// Orders list page handler.
///
/// Names for customers without any name on the order are fetched once per
/// customer for this request.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<OrdersIndexTemplate, AppError> {
    let shop = query.select(&state)?;

    let (orders, load_error) = match shop.client.fetch_orders(state.fetch_limit()).await {
        Ok(orders) => (
            build_summaries(&orders, state.shipping(), &shop.client).await,
            false,
        ),
        Err(e) => {
            tracing::error!(shop = %shop.key, error = %e, "Failed to fetch orders");
            (Vec::new(), true)
        }
    };

    Ok(OrdersIndexTemplate {
        shop_keys: state.shop_keys().map(String::from).collect(),
        shop: shop.key,
        active_page: "orders",
        orders,
        load_error,
    })
}

/// Order detail page handler.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShopQuery>,
) -> Result<OrderShowTemplate, AppError> {
    let shop = query.select(&state)?;

    let order = shop
        .client
        .fetch_order(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;

    let detail = build_detail_with_lookup(&order, state.shipping(), &shop.client).await;

    Ok(OrderShowTemplate {
        shop_keys: state.shop_keys().map(String::from).collect(),
        shop: shop.key,
        active_page: "orders",
        order: detail,
    })
}
