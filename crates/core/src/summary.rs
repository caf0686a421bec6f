//! Order summary rows for the order list and detail views.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::identity::{
    CustomerCache, CustomerLookup, resolve_customer_name, resolve_customer_name_with_lookup,
};
use crate::money::{raw_display, to_money};
use crate::shipping::{ShippingClass, ShippingContext, ShippingPolicy, classify_shipping};
use crate::types::{Fulfillment, LineItem, Order, PLACEHOLDER};

/// One row of the order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummaryRow {
    /// Platform order ID, or `"-"`.
    pub id: String,
    /// Order name (e.g., "#1001"), or `"-"`.
    pub order_number: String,
    /// Creation timestamp as sent by the platform, or `"-"`.
    pub created_at: String,
    /// Grand total as sent by the platform, or `"-"`.
    pub total_price: String,
    /// Currency code, or `"-"`.
    pub currency: String,
    /// Resolved customer display name.
    pub customer_name: String,
    /// Raw shipping method label (`"-"` when missing).
    pub shipping_method: String,
    /// Shipping label as displayed (`"Afhalen"` for pickups).
    pub shipping_display: String,
    /// In-store pickup.
    pub is_pickup: bool,
    /// Highlighted carrier.
    pub is_highlighted: bool,
}

/// A line item on the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLineItem {
    pub product_name: String,
    pub variant_title: Option<String>,
    pub mpn: String,
    pub quantity: u64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&LineItem> for DetailLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            product_name: item.product_name(),
            variant_title: item
                .variant_title
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from),
            mpn: item.mpn(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            line_total: item.line_total(),
        }
    }
}

/// Everything the order detail view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    /// The list-view row for this order.
    pub summary: OrderSummaryRow,
    /// Shipping classification.
    pub shipping: ShippingClass,
    /// Reported subtotal, or the computed line-item total.
    pub subtotal: Decimal,
    /// Sum of all shipping line prices.
    pub shipping_cost: Decimal,
    /// Total tax.
    pub tax: Decimal,
    /// Total discounts.
    pub discounts: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Human-cased financial status.
    pub financial_status: String,
    /// Human-cased fulfillment status.
    pub fulfillment_status: String,
    /// Order note.
    pub note: Option<String>,
    /// Order tags.
    pub tags: Vec<String>,
    /// Line items.
    pub line_items: Vec<DetailLineItem>,
    /// Fulfillment records, untouched.
    pub fulfillments: Vec<Fulfillment>,
}

/// Human-case a platform status: `partially_refunded` -> `Partially refunded`.
///
/// Missing or blank statuses become `"-"`.
#[must_use]
pub fn humanize_status(status: Option<&str>) -> String {
    let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let spaced = status.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Assemble a summary row from an already resolved customer name.
#[must_use]
pub fn summary_row(order: &Order, customer_name: String, shipping: &ShippingClass) -> OrderSummaryRow {
    OrderSummaryRow {
        id: or_placeholder(order.id.as_deref()),
        order_number: order.order_number(),
        created_at: or_placeholder(order.created_at.as_deref()),
        total_price: raw_display(&order.total_price),
        currency: or_placeholder(order.currency.as_deref()),
        customer_name,
        shipping_method: shipping.raw_label.clone(),
        shipping_display: shipping.display_label.clone(),
        is_pickup: shipping.is_pickup,
        is_highlighted: shipping.is_highlighted,
    }
}

/// Build a summary row without customer lookups.
#[must_use]
pub fn build_summary(order: &Order, policy: &ShippingPolicy) -> OrderSummaryRow {
    let shipping = classify_shipping(order, policy, ShippingContext::Summary);
    let customer_name = resolve_customer_name(order, order.pick_name.as_deref());
    summary_row(order, customer_name, &shipping)
}

/// Build summary rows for a batch, fetching unnamed customers once each.
///
/// A fresh [`CustomerCache`] is used for the batch.
pub async fn build_summaries<L>(
    orders: &[Order],
    policy: &ShippingPolicy,
    lookup: &L,
) -> Vec<OrderSummaryRow>
where
    L: CustomerLookup + Sync,
{
    let mut cache = CustomerCache::new();
    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let shipping = classify_shipping(order, policy, ShippingContext::Summary);
        let customer_name =
            resolve_customer_name_with_lookup(order, order.pick_name.as_deref(), lookup, &mut cache)
                .await;
        rows.push(summary_row(order, customer_name, &shipping));
    }
    tracing::debug!(
        orders = orders.len(),
        customer_lookups = cache.len(),
        "Built order summaries"
    );
    rows
}

/// Build the detail view from an already resolved customer name.
#[must_use]
pub fn detail_with_name(order: &Order, policy: &ShippingPolicy, customer_name: String) -> OrderDetail {
    let shipping = classify_shipping(order, policy, ShippingContext::Summary);
    OrderDetail {
        summary: summary_row(order, customer_name, &shipping),
        subtotal: order.subtotal(),
        shipping_cost: order.shipping_cost(),
        tax: to_money(&order.total_tax),
        discounts: to_money(&order.total_discounts),
        total: to_money(&order.total_price),
        financial_status: humanize_status(order.financial_status.as_deref()),
        fulfillment_status: humanize_status(order.fulfillment_status.as_deref()),
        note: order
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from),
        tags: order.tag_list(),
        line_items: order.line_items.iter().map(DetailLineItem::from).collect(),
        fulfillments: order.fulfillments.clone(),
        shipping,
    }
}

/// Build the detail view without customer lookups.
#[must_use]
pub fn build_detail(order: &Order, policy: &ShippingPolicy) -> OrderDetail {
    let customer_name = resolve_customer_name(order, order.pick_name.as_deref());
    detail_with_name(order, policy, customer_name)
}

/// Build the detail view, fetching the customer if nothing local names them.
pub async fn build_detail_with_lookup<L>(
    order: &Order,
    policy: &ShippingPolicy,
    lookup: &L,
) -> OrderDetail
where
    L: CustomerLookup + Sync,
{
    let mut cache = CustomerCache::new();
    let customer_name =
        resolve_customer_name_with_lookup(order, order.pick_name.as_deref(), lookup, &mut cache)
            .await;
    detail_with_name(order, policy, customer_name)
}
