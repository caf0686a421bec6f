//! Customer display-name resolution.
//!
//! Order payloads regularly arrive without a usable customer name: guest
//! checkouts, privacy-redacted customers and B2B accounts that only carry a
//! company. The resolver walks an ordered chain of sources and returns the
//! first non-empty one:
//!
//! 1. the pick-name enrichment value, when supplied;
//! 2. the embedded customer's first/last name (or pre-combined name);
//! 3. the embedded customer's default-address company;
//! 4. the shipping address (full name, first/last, company);
//! 5. the billing address (same order);
//! 6. the order email, the contact email, the customer email;
//! 7. with a [`CustomerLookup`]: steps 2-6 against the fetched customer;
//! 8. `"Customer #<id>"` when a customer ID is known;
//! 9. `"-"`.
//!
//! Steps 2-6 live in [`NAME_CHAIN`] as plain functions over an
//! [`IdentitySource`], so the same chain runs against the order and against
//! a freshly fetched customer record.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;

use crate::types::lenient::non_empty;
use crate::types::{Address, Customer, Order, PLACEHOLDER};

/// The fields a name can be resolved from.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySource<'a> {
    /// Customer record.
    pub customer: Option<&'a Customer>,
    /// Shipping address (or a fetched customer's default address).
    pub shipping: Option<&'a Address>,
    /// Billing address.
    pub billing: Option<&'a Address>,
    /// Email candidates in priority order.
    pub emails: [Option<&'a str>; 3],
}

impl<'a> IdentitySource<'a> {
    /// View an order as a name source.
    #[must_use]
    pub fn from_order(order: &'a Order) -> Self {
        let customer = order.customer.as_ref();
        Self {
            customer,
            shipping: order.shipping_address.as_ref(),
            billing: order.billing_address.as_ref(),
            emails: [
                order.email.as_deref(),
                order.contact_email.as_deref(),
                customer.and_then(|c| c.email.as_deref()),
            ],
        }
    }

    /// View a fetched customer record as a name source.
    ///
    /// The default address stands in for the shipping address.
    #[must_use]
    pub fn from_customer(customer: &'a Customer) -> Self {
        Self {
            customer: Some(customer),
            shipping: customer.default_address.as_ref(),
            billing: None,
            emails: [customer.email.as_deref(), None, None],
        }
    }
}

/// One step of the fallback chain.
pub type NameStrategy = fn(&IdentitySource<'_>) -> Option<String>;

/// Steps 2-6 of the resolution chain, in priority order.
pub const NAME_CHAIN: &[(&str, NameStrategy)] = &[
    ("customer_name", customer_name),
    ("customer_company", customer_company),
    ("shipping_address", shipping_address_name),
    ("billing_address", billing_address_name),
    ("email", contact_email),
];

/// Customer first/last name, else the customer's pre-combined name.
#[must_use]
pub fn customer_name(source: &IdentitySource<'_>) -> Option<String> {
    let customer = source.customer?;
    customer.person_name().or_else(|| trimmed(customer.name.as_deref()))
}

/// Company on the customer's default address.
#[must_use]
pub fn customer_company(source: &IdentitySource<'_>) -> Option<String> {
    source
        .customer?
        .default_address
        .as_ref()
        .and_then(Address::company_name)
        .map(String::from)
}

/// Name on the shipping address.
#[must_use]
pub fn shipping_address_name(source: &IdentitySource<'_>) -> Option<String> {
    source.shipping.and_then(address_name)
}

/// Name on the billing address.
#[must_use]
pub fn billing_address_name(source: &IdentitySource<'_>) -> Option<String> {
    source.billing.and_then(address_name)
}

/// First non-empty email candidate.
#[must_use]
pub fn contact_email(source: &IdentitySource<'_>) -> Option<String> {
    source.emails.iter().find_map(|email| trimmed(*email))
}

/// Full name, else first/last, else company.
fn address_name(address: &Address) -> Option<String> {
    trimmed(address.name.as_deref())
        .or_else(|| address.person_name())
        .or_else(|| address.company_name().map(String::from))
}

fn trimmed(value: Option<&str>) -> Option<String> {
    non_empty(value).map(String::from)
}

/// Run [`NAME_CHAIN`] against a source.
#[must_use]
pub fn first_resolved(source: &IdentitySource<'_>) -> Option<String> {
    NAME_CHAIN.iter().find_map(|(step, strategy)| {
        let name = strategy(source)?;
        tracing::trace!(step = *step, "customer name resolved");
        Some(name)
    })
}

/// Steps 1-6: enrichment value, then the chain against the order.
fn resolve_from_order(order: &Order, enrichment: Option<&str>) -> Option<String> {
    trimmed(enrichment).or_else(|| first_resolved(&IdentitySource::from_order(order)))
}

/// Steps 8-9.
fn unresolved(order: &Order) -> String {
    order
        .customer_id()
        .map_or_else(|| PLACEHOLDER.to_string(), |id| format!("Customer #{id}"))
}

/// Resolve a display name without any network lookup.
///
/// Used where a batch must not trigger extra round-trips (the pick list).
#[must_use]
pub fn resolve_customer_name(order: &Order, enrichment: Option<&str>) -> String {
    resolve_from_order(order, enrichment).unwrap_or_else(|| unresolved(order))
}

/// Resolve a display name, fetching the full customer record if needed.
///
/// The lookup only runs when every local source is empty and the order
/// references a customer ID, and at most once per ID for a given `cache`.
/// Lookup failures are logged and treated as "no customer".
pub async fn resolve_customer_name_with_lookup<L>(
    order: &Order,
    enrichment: Option<&str>,
    lookup: &L,
    cache: &mut CustomerCache,
) -> String
where
    L: CustomerLookup + Sync,
{
    if let Some(name) = resolve_from_order(order, enrichment) {
        return name;
    }

    if let Some(id) = order.customer_id()
        && let Some(customer) = cache.get_or_fetch(id, lookup).await
        && let Some(name) = first_resolved(&IdentitySource::from_customer(customer))
    {
        return name;
    }

    unresolved(order)
}

/// Single-customer lookup used as the last resort of name resolution.
pub trait CustomerLookup {
    /// Lookup failure.
    type Error: Display;

    /// Fetch a customer by ID. `Ok(None)` means not found.
    fn fetch_customer(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send;
}

/// Memo of customer lookups for one pipeline invocation.
///
/// Remembers misses and failures as well as hits, so a customer ID is
/// fetched at most once. Create a fresh cache per request; never share one
/// between concurrent requests.
#[derive(Debug, Default)]
pub struct CustomerCache {
    entries: HashMap<String, Option<Customer>>,
}

impl CustomerCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customer IDs looked up so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lookups have happened yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a customer ID has been looked up.
    #[must_use]
    pub fn contains(&self, customer_id: &str) -> bool {
        self.entries.contains_key(customer_id)
    }

    /// Return the memoized customer, fetching it on first use.
    pub async fn get_or_fetch<L>(&mut self, customer_id: &str, lookup: &L) -> Option<&Customer>
    where
        L: CustomerLookup + Sync,
    {
        if !self.entries.contains_key(customer_id) {
            let fetched = match lookup.fetch_customer(customer_id).await {
                Ok(customer) => customer,
                Err(e) => {
                    tracing::warn!(customer_id, error = %e, "Customer lookup failed");
                    None
                }
            };
            self.entries.insert(customer_id.to_string(), fetched);
        }
        self.entries.get(customer_id).and_then(Option::as_ref)
    }
}
