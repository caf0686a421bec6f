//! Customer and address records as sent by the order source.

use serde::{Deserialize, Serialize};

use super::lenient::{non_empty, opt_string};

/// A shipping, billing or default address.
///
/// Only the identity-bearing fields are modelled; the dashboard never
/// prints full addresses, it only needs someone to put on the pick sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Pre-combined full name, when the platform supplies one.
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
    /// First name.
    #[serde(default, deserialize_with = "opt_string")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, deserialize_with = "opt_string")]
    pub last_name: Option<String>,
    /// Company name.
    #[serde(default, deserialize_with = "opt_string")]
    pub company: Option<String>,
}

impl Address {
    /// First and last name joined by a single space, if either is set.
    #[must_use]
    pub fn person_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// Trimmed company name, if set.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        non_empty(self.company.as_deref())
    }
}

/// A customer, either embedded in an order or fetched on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Platform customer ID (numeric in REST payloads, kept as text).
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    /// First name.
    #[serde(default, deserialize_with = "opt_string")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, deserialize_with = "opt_string")]
    pub last_name: Option<String>,
    /// Pre-combined full name.
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, deserialize_with = "opt_string")]
    pub email: Option<String>,
    /// Default address; B2B accounts often only carry a company here.
    #[serde(default)]
    pub default_address: Option<Address>,
}

impl Customer {
    /// Trimmed customer ID, if set.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    /// First and last name joined by a single space, if either is set.
    #[must_use]
    pub fn person_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

/// Join a first/last name pair, trimming the result.
pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let first = first.unwrap_or("").trim();
    let last = last.unwrap_or("").trim();
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_name() {
        assert_eq!(join_name(Some("Ann"), Some("Smith")).as_deref(), Some("Ann Smith"));
        assert_eq!(join_name(Some(" Ann "), None).as_deref(), Some("Ann"));
        assert_eq!(join_name(None, Some("Smith")).as_deref(), Some("Smith"));
        assert_eq!(join_name(Some(" "), Some("")), None);
    }

    #[test]
    fn test_customer_from_rest_payload() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 207_119_551,
            "email": "bob.norman@mail.example.com",
            "first_name": "Bob",
            "last_name": null,
            "default_address": {"company": "Norman Lighting", "first_name": null}
        }))
        .unwrap();

        assert_eq!(customer.customer_id(), Some("207119551"));
        assert_eq!(customer.person_name().as_deref(), Some("Bob"));
        assert_eq!(
            customer.default_address.unwrap().company_name(),
            Some("Norman Lighting")
        );
    }
}
