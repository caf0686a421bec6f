//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Formats an amount as euros with two decimals.
///
/// Values that are not numbers are shown unchanged.
///
/// Usage in templates: `{{ row.unit_price|euro }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn euro(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_euro(&value.to_string()))
}

fn format_euro(raw: &str) -> String {
    Decimal::from_str(raw.trim()).map_or_else(
        |_| raw.to_string(),
        |amount| format!("€ {:.2}", amount.round_dp(2)),
    )
}
