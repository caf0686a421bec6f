//! Order records as returned by the Shopify REST Admin API.
//!
//! Every field is optional on the wire. Monetary amounts and quantities are
//! kept as raw JSON and only interpreted through [`crate::money`] and
//! [`LineItem::quantity`], so a malformed value degrades to zero instead of
//! rejecting the order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::customer::{Address, Customer};
use super::lenient::{non_empty, null_as_default, opt_string, string_list};
use crate::money::{is_present, to_money};

/// Placeholder shown wherever a value could not be derived.
pub const PLACEHOLDER: &str = "-";

/// An order from the platform. Read-only once fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Platform order ID.
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    /// Human-readable order name (e.g., "#1001").
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
    /// Sequential order number without prefix.
    #[serde(default, deserialize_with = "opt_string")]
    pub order_number: Option<String>,
    /// Creation timestamp (ISO 8601 as sent by the platform).
    #[serde(default, deserialize_with = "opt_string")]
    pub created_at: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, deserialize_with = "opt_string")]
    pub currency: Option<String>,
    /// Subtotal after edits and refunds.
    #[serde(default)]
    pub current_subtotal_price: Value,
    /// Subtotal as originally placed.
    #[serde(default)]
    pub subtotal_price: Value,
    /// Total tax.
    #[serde(default)]
    pub total_tax: Value,
    /// Total discounts.
    #[serde(default)]
    pub total_discounts: Value,
    /// Grand total.
    #[serde(default)]
    pub total_price: Value,
    /// Free-text order note.
    #[serde(default, deserialize_with = "opt_string")]
    pub note: Option<String>,
    /// Comma-separated tag string.
    #[serde(default, deserialize_with = "opt_string")]
    pub tags: Option<String>,
    /// Order-level contact email.
    #[serde(default, deserialize_with = "opt_string")]
    pub email: Option<String>,
    /// Secondary contact email.
    #[serde(default, deserialize_with = "opt_string")]
    pub contact_email: Option<String>,
    /// Financial status (e.g., `paid`, `partially_refunded`).
    #[serde(default, deserialize_with = "opt_string")]
    pub financial_status: Option<String>,
    /// Fulfillment status (e.g., `partial`; `null` while unfulfilled).
    #[serde(default, deserialize_with = "opt_string")]
    pub fulfillment_status: Option<String>,
    /// Embedded customer reference.
    #[serde(default)]
    pub customer: Option<Customer>,
    /// Shipping address.
    #[serde(default)]
    pub shipping_address: Option<Address>,
    /// Billing address.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Shipping lines; usually one, empty for in-store pickup.
    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping_lines: Vec<ShippingLine>,
    /// Line items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    /// Fulfillment records.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fulfillments: Vec<Fulfillment>,
    /// Custom pick name from the metafield lookup, attached after fetching.
    #[serde(default, skip_deserializing)]
    pub pick_name: Option<String>,
}

/// A shipping line on an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    /// Shipping method title as shown at checkout.
    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,
    /// Carrier or rate code.
    #[serde(default, deserialize_with = "opt_string")]
    pub code: Option<String>,
    /// Price charged for this line.
    #[serde(default)]
    pub price: Value,
}

/// A line item on an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product title.
    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,
    /// Variant title.
    #[serde(default, deserialize_with = "opt_string")]
    pub variant_title: Option<String>,
    /// Ordered quantity (raw).
    #[serde(default)]
    pub quantity: Value,
    /// Unit price (raw).
    #[serde(default)]
    pub price: Value,
    /// Stock keeping unit.
    #[serde(default, deserialize_with = "opt_string")]
    pub sku: Option<String>,
    /// Manufacturer part number.
    #[serde(default, deserialize_with = "opt_string")]
    pub mpn: Option<String>,
}

/// A fulfillment record, passed through to the detail view untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    /// Fulfillment name (e.g., "#1001.1").
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
    /// Fulfillment status.
    #[serde(default, deserialize_with = "opt_string")]
    pub status: Option<String>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "opt_string")]
    pub created_at: Option<String>,
    /// Carrier name.
    #[serde(default, deserialize_with = "opt_string")]
    pub tracking_company: Option<String>,
    /// Tracking numbers.
    #[serde(default, deserialize_with = "string_list")]
    pub tracking_numbers: Vec<String>,
    /// Tracking URLs.
    #[serde(default, deserialize_with = "string_list")]
    pub tracking_urls: Vec<String>,
}

impl Order {
    /// Order name, else order number, else `"-"`.
    #[must_use]
    pub fn order_number(&self) -> String {
        non_empty(self.name.as_deref())
            .or_else(|| non_empty(self.order_number.as_deref()))
            .unwrap_or(PLACEHOLDER)
            .to_string()
    }

    /// Customer ID of the embedded customer, if any.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().and_then(Customer::customer_id)
    }

    /// Order subtotal.
    ///
    /// Uses the platform-reported subtotal (`current_subtotal_price`, then
    /// `subtotal_price`). When neither is present, or the reported value is
    /// zero, falls back to the sum of unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        let reported = [&self.current_subtotal_price, &self.subtotal_price]
            .into_iter()
            .find(|value| is_present(value))
            .map_or(Decimal::ZERO, to_money);

        if reported.is_zero() {
            self.line_items_total()
        } else {
            reported
        }
    }

    /// Sum of unit price times quantity over all line items.
    #[must_use]
    pub fn line_items_total(&self) -> Decimal {
        self.line_items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Sum of all shipping line prices.
    #[must_use]
    pub fn shipping_cost(&self) -> Decimal {
        self.shipping_lines
            .iter()
            .fold(Decimal::ZERO, |acc, line| acc.saturating_add(to_money(&line.price)))
    }

    /// Trimmed title of the first shipping line, if it has one.
    #[must_use]
    pub fn first_shipping_title(&self) -> Option<&str> {
        self.shipping_lines
            .first()
            .and_then(|line| non_empty(line.title.as_deref()))
    }

    /// Tags split on commas, trimmed, empties dropped.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl LineItem {
    /// Quantity coerced to a non-negative integer.
    ///
    /// Integers pass through, non-negative floats are truncated, numeric
    /// strings are parsed. Everything else is 0.
    // Truncation is the documented coercion; negatives are filtered out first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn quantity(&self) -> u64 {
        match &self.quantity {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            }),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .unwrap_or(0)
    }

    /// Normalized unit price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        to_money(&self.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price()
            .saturating_mul(Decimal::from(self.quantity()))
    }

    /// Trimmed product title, or `"-"`.
    #[must_use]
    pub fn product_name(&self) -> String {
        non_empty(self.title.as_deref())
            .unwrap_or(PLACEHOLDER)
            .to_string()
    }

    /// Manufacturer part number, else SKU, else `"-"`.
    #[must_use]
    pub fn mpn(&self) -> String {
        non_empty(self.mpn.as_deref())
            .or_else(|| non_empty(self.sku.as_deref()))
            .unwrap_or(PLACEHOLDER)
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(value: Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rest_payload_with_nulls_and_mixed_types() {
        let order = order(json!({
            "id": 450_789_469,
            "name": "#1001",
            "order_number": 1001,
            "total_price": "409.94",
            "shipping_lines": null,
            "line_items": [{"title": "Lamp", "quantity": "2", "price": 9.99, "sku": null}],
            "fulfillments": null,
            "customer": null
        }));

        assert_eq!(order.id.as_deref(), Some("450789469"));
        assert!(order.shipping_lines.is_empty());
        assert!(order.fulfillments.is_empty());
        assert!(order.customer.is_none());
        assert_eq!(order.line_items.len(), 1);
        assert!(order.pick_name.is_none());
    }

    #[test]
    fn test_pick_name_is_not_read_from_payload() {
        let order = order(json!({"pick_name": "Injected"}));
        assert!(order.pick_name.is_none());
    }

    #[test]
    fn test_order_number_fallbacks() {
        assert_eq!(order(json!({"name": "#1001", "order_number": 1001})).order_number(), "#1001");
        assert_eq!(order(json!({"name": " ", "order_number": 1001})).order_number(), "1001");
        assert_eq!(order(json!({})).order_number(), "-");
    }

    #[test]
    fn test_quantity_coercion() {
        let qty = |raw: Value| LineItem { quantity: raw, ..LineItem::default() }.quantity();
        assert_eq!(qty(json!(3)), 3);
        assert_eq!(qty(json!("4")), 4);
        assert_eq!(qty(json!(2.7)), 2);
        assert_eq!(qty(json!(-1)), 0);
        assert_eq!(qty(json!("two")), 0);
        assert_eq!(qty(json!(null)), 0);
    }

    #[test]
    fn test_mpn_prefers_part_number_then_sku() {
        let item = |mpn: Option<&str>, sku: Option<&str>| LineItem {
            mpn: mpn.map(String::from),
            sku: sku.map(String::from),
            ..LineItem::default()
        };
        assert_eq!(item(Some("MPN-1"), Some("SKU-1")).mpn(), "MPN-1");
        assert_eq!(item(Some("  "), Some("SKU-1")).mpn(), "SKU-1");
        assert_eq!(item(None, None).mpn(), "-");
    }

    #[test]
    fn test_subtotal_prefers_reported_value() {
        let order = order(json!({
            "current_subtotal_price": "20.00",
            "subtotal_price": "25.00",
            "line_items": [{"quantity": 1, "price": "99.00"}]
        }));
        assert_eq!(order.subtotal(), Decimal::from(20));
    }

    #[test]
    fn test_subtotal_computed_when_reported_is_zero_or_absent() {
        let zero = order(json!({
            "subtotal_price": "0.00",
            "line_items": [
                {"quantity": 2, "price": "9.99"},
                {"quantity": 1, "price": "4.50"}
            ]
        }));
        assert_eq!(zero.subtotal(), Decimal::new(2448, 2));

        let absent = order(json!({"line_items": [{"quantity": "3", "price": "1.25"}]}));
        assert_eq!(absent.subtotal(), Decimal::new(375, 2));
    }

    #[test]
    fn test_shipping_cost_sums_all_lines() {
        let order = order(json!({
            "shipping_lines": [
                {"title": "Pakket", "price": "6.95"},
                {"title": "Toeslag", "price": 2},
                {"title": "Broken", "price": "n/a"}
            ]
        }));
        assert_eq!(order.shipping_cost(), Decimal::new(895, 2));
        assert_eq!(order.first_shipping_title(), Some("Pakket"));
    }

    #[test]
    fn test_tag_list() {
        let order = order(json!({"tags": "vip, ,  wholesale,"}));
        assert_eq!(order.tag_list(), vec!["vip", "wholesale"]);
    }

    #[test]
    fn test_fulfillment_passthrough() {
        let order = order(json!({
            "fulfillments": [{
                "name": "#1001.1",
                "status": "success",
                "tracking_company": "bpost",
                "tracking_numbers": ["3232"],
                "tracking_urls": ["https://track.example/3232"]
            }]
        }));
        let fulfillment = &order.fulfillments[0];
        assert_eq!(fulfillment.tracking_company.as_deref(), Some("bpost"));
        assert_eq!(fulfillment.tracking_numbers, vec!["3232"]);
    }
}
