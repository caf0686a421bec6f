//! Printable warehouse pick list.
//!
//! One [`PickRow`] per line item, carrying the order-level context a picker
//! needs. Rows are sorted so each order's items are contiguous, and the
//! first row of every order is flagged to drive group separators.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::identity::resolve_customer_name;
use crate::shipping::{ShippingContext, ShippingPolicy, classify_shipping};
use crate::types::Order;

/// One line item on the pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickRow {
    pub order_number: String,
    pub customer_name: String,
    pub mpn: String,
    pub quantity: u64,
    pub product_name: String,
    pub unit_price: Decimal,
    pub order_subtotal: Decimal,
    /// Display label of the shipping method.
    pub shipping_method: String,
    pub is_pickup: bool,
    pub is_highlighted: bool,
    pub is_multi_quantity: bool,
    pub is_first_in_order: bool,
}

impl PickRow {
    fn sort_key(&self) -> (&str, &str, &str) {
        (&self.order_number, &self.product_name, &self.mpn)
    }
}

/// Build the sorted pick list for a batch of orders.
///
/// Customer names are resolved from local data and the pick-name
/// enrichment only; this never fetches. Orders without line items
/// contribute no rows.
#[must_use]
pub fn build_pick_rows(orders: &[Order], policy: &ShippingPolicy) -> Vec<PickRow> {
    let mut rows = Vec::new();

    for order in orders {
        let order_number = order.order_number();
        let customer_name = resolve_customer_name(order, order.pick_name.as_deref());
        let shipping = classify_shipping(order, policy, ShippingContext::PickList);
        let order_subtotal = order.subtotal();

        rows.extend(order.line_items.iter().map(|item| {
            let quantity = item.quantity();
            PickRow {
                order_number: order_number.clone(),
                customer_name: customer_name.clone(),
                mpn: item.mpn(),
                quantity,
                product_name: item.product_name(),
                unit_price: item.unit_price(),
                order_subtotal,
                shipping_method: shipping.display_label.clone(),
                is_pickup: shipping.is_pickup,
                is_highlighted: shipping.is_highlighted,
                is_multi_quantity: quantity > 1,
                is_first_in_order: false,
            }
        }));
    }

    // Stable: equal keys keep input order.
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut previous: Option<String> = None;
    for row in &mut rows {
        row.is_first_in_order = previous.as_deref() != Some(row.order_number.as_str());
        if row.is_first_in_order {
            previous = Some(row.order_number.clone());
        }
    }

    tracing::debug!(orders = orders.len(), rows = rows.len(), "Built pick rows");
    rows
}

/// Header totals for a pick list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PickListSummary {
    /// Number of pick rows.
    pub rows: usize,
    /// Number of distinct orders.
    pub orders: usize,
    /// Sum of all quantities.
    pub total_quantity: u64,
}

impl PickListSummary {
    /// Summarize a set of pick rows.
    #[must_use]
    pub fn from_rows(rows: &[PickRow]) -> Self {
        let orders: BTreeSet<&str> = rows.iter().map(|r| r.order_number.as_str()).collect();
        Self {
            rows: rows.len(),
            orders: orders.len(),
            total_quantity: rows
                .iter()
                .fold(0, |acc, r| acc.saturating_add(r.quantity)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::shipping::PICKUP_DISPLAY_LABEL;

    fn orders(value: serde_json::Value) -> Vec<Order> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rows_sorted_by_order_then_product() {
        let orders = orders(json!([
            {
                "name": "#1001",
                "line_items": [{"title": "Lamp", "quantity": 2, "price": "9.99", "sku": "L1"}]
            },
            {
                "name": "#1000",
                "line_items": [{"title": "Cable", "quantity": 1, "price": "4.50"}]
            }
        ]));

        let rows = build_pick_rows(&orders, &ShippingPolicy::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_number, "#1000");
        assert!(rows[0].is_first_in_order);
        assert!(!rows[0].is_multi_quantity);
        assert_eq!(rows[0].mpn, "-");
        assert_eq!(rows[1].order_number, "#1001");
        assert!(rows[1].is_first_in_order);
        assert!(rows[1].is_multi_quantity);
        assert_eq!(rows[1].mpn, "L1");
        assert_eq!(rows[1].unit_price, Decimal::new(999, 2));
    }

    #[test]
    fn test_rows_share_order_level_fields() {
        let mut orders = orders(json!([{
            "name": "#2000",
            "customer": {"first_name": "Ann", "last_name": "Smith"},
            "shipping_lines": [{"title": "Pakket Belgie"}],
            "line_items": [
                {"title": "Switch", "quantity": 1, "price": "3.00", "mpn": "S-2"},
                {"title": "Switch", "quantity": 4, "price": "3.00", "mpn": "S-1"},
                {"title": "Bulb", "quantity": "3", "price": 1.5}
            ]
        }]));
        orders[0].pick_name = Some("Smith Lighting".to_string());

        let rows = build_pick_rows(&orders, &ShippingPolicy::default());

        assert_eq!(rows.len(), 3);
        let products: Vec<_> = rows.iter().map(|r| (r.product_name.as_str(), r.mpn.as_str())).collect();
        assert_eq!(products, vec![("Bulb", "-"), ("Switch", "S-1"), ("Switch", "S-2")]);
        for row in &rows {
            assert_eq!(row.customer_name, "Smith Lighting");
            assert_eq!(row.shipping_method, "Pakket Belgie");
            assert!(row.is_highlighted);
            assert_eq!(row.order_subtotal, Decimal::new(1950, 2));
        }
        let firsts = rows.iter().filter(|r| r.is_first_in_order).count();
        assert_eq!(firsts, 1);
        assert!(rows[0].is_first_in_order);
    }

    #[test]
    fn test_pickup_fallback_without_shipping_lines() {
        let orders = orders(json!([{
            "name": "#3000",
            "line_items": [{"title": "Lamp", "quantity": 1}]
        }]));

        let rows = build_pick_rows(&orders, &ShippingPolicy::default());

        assert_eq!(rows[0].shipping_method, PICKUP_DISPLAY_LABEL);
        assert!(rows[0].is_pickup);
        assert!(!rows[0].is_highlighted);
    }

    #[test]
    fn test_orders_without_line_items_produce_no_rows() {
        let orders = orders(json!([
            {"name": "#1", "line_items": []},
            {"name": "#2", "line_items": null},
            {"name": "#3"}
        ]));

        assert!(build_pick_rows(&orders, &ShippingPolicy::default()).is_empty());
        assert!(build_pick_rows(&[], &ShippingPolicy::default()).is_empty());
    }

    #[test]
    fn test_missing_item_fields_degrade() {
        let orders = orders(json!([{"line_items": [{"quantity": "many", "price": "n/a"}]}]));

        let rows = build_pick_rows(&orders, &ShippingPolicy::default());

        assert_eq!(rows[0].order_number, "-");
        assert_eq!(rows[0].product_name, "-");
        assert_eq!(rows[0].mpn, "-");
        assert_eq!(rows[0].quantity, 0);
        assert_eq!(rows[0].unit_price, Decimal::ZERO);
        assert_eq!(rows[0].customer_name, "-");
    }

    #[test]
    fn test_build_pick_rows_is_idempotent() {
        let orders = orders(json!([
            {"name": "#5", "line_items": [{"title": "B", "quantity": 2}, {"title": "A", "quantity": 1}]},
            {"name": "#4", "customer": {"id": 42}, "line_items": [{"title": "C", "quantity": 1}]}
        ]));
        let before = orders.clone();

        let first = serde_json::to_string(&build_pick_rows(&orders, &ShippingPolicy::default())).unwrap();
        let second = serde_json::to_string(&build_pick_rows(&orders, &ShippingPolicy::default())).unwrap();

        assert_eq!(first, second);
        assert_eq!(orders, before);
        assert!(first.contains("Customer #42"));
    }

    #[test]
    fn test_pick_list_summary() {
        let orders = orders(json!([
            {"name": "#1", "line_items": [{"title": "A", "quantity": 2}, {"title": "B", "quantity": 3}]},
            {"name": "#2", "line_items": [{"title": "C", "quantity": 1}]}
        ]));
        let rows = build_pick_rows(&orders, &ShippingPolicy::default());

        let summary = PickListSummary::from_rows(&rows);

        assert_eq!(
            summary,
            PickListSummary {
                rows: 3,
                orders: 2,
                total_quantity: 6
            }
        );
    }
}
