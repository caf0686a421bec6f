//! Shipping method classification.
//!
//! Turns the first shipping line of an order into a label for display and
//! sorts it into the buckets the warehouse cares about: in-store pickup,
//! carriers that get a highlighted row on the printed pick sheet, and
//! everything else.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{Order, PLACEHOLDER};

/// Exact shipping title the storefront uses for in-store pickup.
pub const PICKUP_TITLE: &str = "Afhalen in de winkel";

/// Label shown for every pickup order.
pub const PICKUP_DISPLAY_LABEL: &str = "Afhalen";

/// Raw label used on the pick list when an order has no shipping lines.
///
/// The storefront only creates shipping lines for carrier deliveries, so an
/// order without any is collected in person.
pub const PICKUP_FALLBACK_LABEL: &str = "Afhalen / Pickup";

/// Default lowercase substrings that also mark a pickup.
pub const DEFAULT_PICKUP_ALIASES: &[&str] = &["afhalen"];

/// Default carrier titles rendered highlighted on the pick sheet.
pub const DEFAULT_HIGHLIGHTED_CARRIERS: &[&str] = &["Pakket Belgie", "Pakket"];

/// Which screen a classification is for.
///
/// The two screens disagree on what "no shipping lines" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingContext {
    /// Order list and detail views: missing shipping is just missing (`"-"`).
    Summary,
    /// Pick list: missing shipping lines means the order is picked up.
    PickList,
}

/// Shipping rules for one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingPolicy {
    pickup_title: String,
    pickup_aliases: Vec<String>,
    highlighted_carriers: BTreeSet<String>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::new(
            PICKUP_TITLE,
            DEFAULT_PICKUP_ALIASES.iter().copied(),
            DEFAULT_HIGHLIGHTED_CARRIERS.iter().copied(),
        )
    }
}

impl ShippingPolicy {
    /// Build a policy. Aliases are lowercased and blank entries dropped.
    #[must_use]
    pub fn new<A, H>(pickup_title: &str, pickup_aliases: A, highlighted_carriers: H) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        Self {
            pickup_title: pickup_title.trim().to_string(),
            pickup_aliases: pickup_aliases
                .into_iter()
                .map(|a| a.as_ref().trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            highlighted_carriers: highlighted_carriers
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// The exact pickup title.
    #[must_use]
    pub fn pickup_title(&self) -> &str {
        &self.pickup_title
    }

    /// Lowercase pickup alias fragments.
    #[must_use]
    pub fn pickup_aliases(&self) -> &[String] {
        &self.pickup_aliases
    }

    /// Highlighted carrier titles.
    #[must_use]
    pub const fn highlighted_carriers(&self) -> &BTreeSet<String> {
        &self.highlighted_carriers
    }

    /// Whether a raw shipping label means in-store pickup.
    #[must_use]
    pub fn is_pickup(&self, raw_label: &str) -> bool {
        if raw_label == self.pickup_title || raw_label == PICKUP_FALLBACK_LABEL {
            return true;
        }
        let lower = raw_label.to_lowercase();
        self.pickup_aliases
            .iter()
            .any(|alias| lower.contains(alias.as_str()))
    }

    /// Whether a raw shipping label is a highlighted carrier.
    #[must_use]
    pub fn is_highlighted(&self, raw_label: &str) -> bool {
        self.highlighted_carriers.contains(raw_label)
    }

    /// Classify a raw label.
    #[must_use]
    pub fn classify_label(&self, raw_label: &str) -> ShippingClass {
        let is_pickup = self.is_pickup(raw_label);
        ShippingClass {
            raw_label: raw_label.to_string(),
            display_label: if is_pickup {
                PICKUP_DISPLAY_LABEL.to_string()
            } else {
                raw_label.to_string()
            },
            is_pickup,
            is_highlighted: self.is_highlighted(raw_label),
        }
    }
}

/// Result of classifying an order's shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingClass {
    /// Title of the first shipping line, or the context fallback.
    pub raw_label: String,
    /// `"Afhalen"` for pickups, otherwise the raw label.
    pub display_label: String,
    /// In-store pickup.
    pub is_pickup: bool,
    /// Carrier that gets highlighted on the pick sheet.
    pub is_highlighted: bool,
}

/// Classify the shipping of an order.
///
/// Reads only the first shipping line. With no shipping lines at all the
/// pick list treats the order as a pickup; the summary views show `"-"`.
/// A shipping line with a blank title is a data gap in both contexts.
#[must_use]
pub fn classify_shipping(
    order: &Order,
    policy: &ShippingPolicy,
    context: ShippingContext,
) -> ShippingClass {
    let raw_label = match (order.first_shipping_title(), context) {
        (Some(title), _) => title,
        (None, ShippingContext::PickList) if order.shipping_lines.is_empty() => {
            PICKUP_FALLBACK_LABEL
        }
        (None, _) => PLACEHOLDER,
    };

    if raw_label == PLACEHOLDER {
        return ShippingClass {
            raw_label: PLACEHOLDER.to_string(),
            display_label: PLACEHOLDER.to_string(),
            is_pickup: false,
            is_highlighted: false,
        };
    }

    policy.classify_label(raw_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShippingLine;

    fn order_with_titles(titles: &[Option<&str>]) -> Order {
        Order {
            shipping_lines: titles
                .iter()
                .map(|title| ShippingLine {
                    title: title.map(String::from),
                    ..ShippingLine::default()
                })
                .collect(),
            ..Order::default()
        }
    }

    #[test]
    fn test_pickup_title() {
        let class = classify_shipping(
            &order_with_titles(&[Some("Afhalen in de winkel")]),
            &ShippingPolicy::default(),
            ShippingContext::Summary,
        );
        assert!(class.is_pickup);
        assert!(!class.is_highlighted);
        assert_eq!(class.raw_label, "Afhalen in de winkel");
        assert_eq!(class.display_label, "Afhalen");
    }

    #[test]
    fn test_highlighted_carrier() {
        let class = classify_shipping(
            &order_with_titles(&[Some("Pakket Belgie")]),
            &ShippingPolicy::default(),
            ShippingContext::PickList,
        );
        assert!(class.is_highlighted);
        assert!(!class.is_pickup);
        assert_eq!(class.display_label, "Pakket Belgie");
    }

    #[test]
    fn test_alias_substring_is_case_insensitive() {
        let policy = ShippingPolicy::new(PICKUP_TITLE, ["Kerkstraat"], DEFAULT_HIGHLIGHTED_CARRIERS);
        let class = classify_shipping(
            &order_with_titles(&[Some("Ophalen KERKSTRAAT 12")]),
            &policy,
            ShippingContext::Summary,
        );
        assert!(class.is_pickup);
        assert_eq!(class.display_label, "Afhalen");
        assert_eq!(class.raw_label, "Ophalen KERKSTRAAT 12");
    }

    #[test]
    fn test_standard_carrier() {
        let class = classify_shipping(
            &order_with_titles(&[Some("PostNL"), Some("Pakket")]),
            &ShippingPolicy::default(),
            ShippingContext::Summary,
        );
        assert_eq!(class.raw_label, "PostNL");
        assert!(!class.is_pickup);
        assert!(!class.is_highlighted);
    }

    #[test]
    fn test_no_shipping_lines_depends_on_context() {
        let order = Order::default();
        let policy = ShippingPolicy::default();

        let summary = classify_shipping(&order, &policy, ShippingContext::Summary);
        assert_eq!(summary.raw_label, "-");
        assert!(!summary.is_pickup);

        let pick = classify_shipping(&order, &policy, ShippingContext::PickList);
        assert_eq!(pick.raw_label, PICKUP_FALLBACK_LABEL);
        assert_eq!(pick.display_label, "Afhalen");
        assert!(pick.is_pickup);
    }

    #[test]
    fn test_blank_title_is_a_gap_in_both_contexts() {
        let order = order_with_titles(&[Some("  ")]);
        let policy = ShippingPolicy::default();
        for context in [ShippingContext::Summary, ShippingContext::PickList] {
            let class = classify_shipping(&order, &policy, context);
            assert_eq!(class.raw_label, "-");
            assert!(!class.is_pickup);
        }
    }

    #[test]
    fn test_policy_normalizes_input() {
        let policy = ShippingPolicy::new(" Afhalen in de winkel ", ["  ", "Markt"], ["", "DPD"]);
        assert_eq!(policy.pickup_title(), "Afhalen in de winkel");
        assert_eq!(policy.pickup_aliases(), ["markt".to_string()]);
        assert!(policy.is_highlighted("DPD"));
        assert_eq!(policy.highlighted_carriers().len(), 1);
    }
}
