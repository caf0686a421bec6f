//! Printable warehouse pick list.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use pickboard_core::picklist::{PickListSummary, PickRow, build_pick_rows};
use tracing::instrument;

use crate::{error::AppError, filters, state::AppState};

use super::ShopQuery;

/// Pick list page template.
#[derive(Template, WebTemplate)]
#[template(path = "picklists/index.html")]
pub struct PicklistTemplate {
    pub shop: String,
    pub shop_keys: Vec<String>,
    pub active_page: &'static str,
    pub rows: Vec<PickRow>,
    pub summary: PickListSummary,
    /// Local time the list was generated, printed in the header.
    pub generated_at: String,
    pub load_error: bool,
}

/// Pick list page handler.
///
/// Never looks up customers; names come from the orders and pick names.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<PicklistTemplate, AppError> {
    let shop = query.select(&state)?;

    let (rows, load_error) = match shop.client.fetch_orders(state.fetch_limit()).await {
        Ok(orders) => (build_pick_rows(&orders, state.shipping()), false),
        Err(e) => {
            tracing::error!(shop = %shop.key, error = %e, "Failed to fetch orders for pick list");
            (Vec::new(), true)
        }
    };

    Ok(PicklistTemplate {
        summary: PickListSummary::from_rows(&rows),
        shop_keys: state.shop_keys().map(String::from).collect(),
        shop: shop.key,
        active_page: "picklijsten",
        rows,
        generated_at: chrono::Local::now().format("%d-%m-%Y %H:%M").to_string(),
        load_error,
    })
}
