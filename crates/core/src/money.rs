//! Money normalization for raw platform amounts.
//!
//! Shopify sends monetary fields as decimal strings (`"12.50"`), but older
//! payloads, apps and hand-edited fixtures also produce bare numbers, empty
//! strings and `null`. Everything funnels through [`to_money`], which never
//! fails: anything that is not a readable number is worth exactly zero.
//!
//! Callers that must tell "absent" apart from "zero" check [`is_present`]
//! before normalizing.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

/// Normalize a raw monetary value into a [`Decimal`].
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace and
/// scientific notation allowed). `null`, booleans, objects, arrays and
/// unparseable strings all yield [`Decimal::ZERO`].
///
/// # Examples
///
/// ```
/// use pickboard_core::money::to_money;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(to_money(&json!("12.50")), Decimal::new(1250, 2));
/// assert_eq!(to_money(&json!(12.5)), Decimal::new(125, 1));
/// assert_eq!(to_money(&json!("twelve")), Decimal::ZERO);
/// assert_eq!(to_money(&json!(null)), Decimal::ZERO);
/// ```
#[must_use]
pub fn to_money(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => number_to_decimal(n),
        Value::String(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

/// Whether a raw monetary field carries anything at all.
///
/// `null` and blank strings count as absent; `"0.00"` is present.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Render a raw monetary field verbatim for list views.
///
/// Strings are passed through trimmed, numbers use their JSON form and
/// anything absent becomes `"-"`.
#[must_use]
pub fn raw_display(value: &Value) -> String {
    match value {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => "-".to_string(),
    }
}

fn number_to_decimal(n: &serde_json::Number) -> Decimal {
    if let Some(i) = n.as_i64() {
        return Decimal::from(i);
    }
    if let Some(u) = n.as_u64() {
        return Decimal::from(u);
    }
    n.as_f64().and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO)
}

fn parse_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_string() {
        assert_eq!(to_money(&json!("12.50")), Decimal::new(125, 1));
        assert_eq!(to_money(&json!(" 4.5 ")), Decimal::new(45, 1));
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(to_money(&json!(12.5)), Decimal::new(125, 1));
        assert_eq!(to_money(&json!(7)), Decimal::from(7));
        assert_eq!(to_money(&json!(-3)), Decimal::from(-3));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(to_money(&json!("1e3")), Decimal::from(1000));
    }

    #[test]
    fn test_malformed_is_zero() {
        for value in [
            json!(null),
            json!(""),
            json!("   "),
            json!("abc"),
            json!("12,50"),
            json!(true),
            json!([]),
            json!({"amount": "1.00"}),
        ] {
            assert_eq!(to_money(&value), Decimal::ZERO, "input: {value}");
        }
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(" ")));
        assert!(is_present(&json!("0.00")));
        assert!(is_present(&json!(0)));
    }

    #[test]
    fn test_raw_display() {
        assert_eq!(raw_display(&json!("19.95")), "19.95");
        assert_eq!(raw_display(&json!(19.95)), "19.95");
        assert_eq!(raw_display(&json!(null)), "-");
        assert_eq!(raw_display(&json!("")), "-");
    }
}
