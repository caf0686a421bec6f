//! Forgiving deserializers for platform payloads.
//!
//! The order source may omit any field, send `null` where a list is
//! expected, or switch between numbers and strings for identifiers
//! depending on API version and the app that last touched the record.
//! These helpers keep a single odd field from rejecting a whole order.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a string-ish field.
///
/// Strings are kept, numbers and booleans are rendered to text, anything
/// else (including `null`) becomes `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// Deserialize a field whose `null` means "use the default".
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a list of strings, skipping entries that are not string-ish.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        Some(other) => value_to_string(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Render a scalar JSON value as text.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Trimmed, non-empty view of an optional string.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "string_list")]
        numbers: Vec<String>,
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let probe: Probe = serde_json::from_value(json!({"id": 450_789_469})).unwrap();
        assert_eq!(probe.id.as_deref(), Some("450789469"));
    }

    #[test]
    fn test_null_and_absent() {
        let probe: Probe = serde_json::from_value(json!({"id": null, "items": null})).unwrap();
        assert!(probe.id.is_none());
        assert!(probe.items.is_empty());
        assert!(probe.numbers.is_empty());
    }

    #[test]
    fn test_string_list_accepts_scalars_and_mixed_arrays() {
        let probe: Probe =
            serde_json::from_value(json!({"numbers": ["1Z999", 42, null, {"x": 1}]})).unwrap();
        assert_eq!(probe.numbers, vec!["1Z999", "42"]);

        let probe: Probe = serde_json::from_value(json!({"numbers": "1Z999"})).unwrap();
        assert_eq!(probe.numbers, vec!["1Z999"]);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Ann ")), Some("Ann"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
