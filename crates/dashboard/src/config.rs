//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_SHOP` - Shopify store domain (e.g., abc-led.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token (read orders, customers)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-07)
//! - `DASHBOARD_SHOP_KEY` - Key used in `?shop=` (default: abc-led)
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 8000)
//! - `ORDER_FETCH_LIMIT` - Orders per fetch, 1-250 (default: 50)
//! - `PICK_NAME_NAMESPACE` / `PICK_NAME_KEY` - Order metafield holding the
//!   pick name (default: custom / `pick_name`)
//! - `PICKUP_TITLE` - Shipping title meaning in-store pickup
//! - `PICKUP_ALIASES` - Comma separated substrings that also mean pickup
//! - `HIGHLIGHTED_CARRIERS` - Comma separated carrier titles to highlight
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `DASHBOARD_TLS_CERT` - PEM-encoded certificate chain
//! - `DASHBOARD_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use pickboard_core::shipping::{
    DEFAULT_HIGHLIGHTED_CARRIERS, DEFAULT_PICKUP_ALIASES, PICKUP_TITLE, ShippingPolicy,
};
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Shopify Admin API version.
pub const DEFAULT_API_VERSION: &str = "2025-07";
/// Default shop key for `?shop=`.
pub const DEFAULT_SHOP_KEY: &str = "abc-led";
/// Default number of orders fetched per page load.
pub const DEFAULT_FETCH_LIMIT: u16 = 50;
/// Largest page size the orders endpoint accepts.
pub const MAX_FETCH_LIMIT: u16 = 250;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// The shop served by this dashboard
    pub shop: ShopConfig,
    /// Orders fetched per list or pick list page
    pub fetch_limit: u16,
    /// Metafield read for the pick name enrichment
    pub pick_name: PickNameField,
    /// Pickup and highlighted carrier rules
    pub shipping: ShippingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Connection details for one Shopify store.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopConfig {
    /// Key used to select this shop (`?shop=abc-led`)
    pub key: String,
    /// Store domain (e.g., abc-led.myshopify.com)
    pub domain: String,
    /// Admin API version (e.g., 2025-07)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("key", &self.key)
            .field("domain", &self.domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopConfig {
    /// Base URL of the versioned Admin API.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}",
            self.domain.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Order metafield holding the pick name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickNameField {
    pub namespace: String,
    pub key: String,
}

impl Default for PickNameField {
    fn default() -> Self {
        Self {
            namespace: "custom".to_string(),
            key: "pick_name".to_string(),
        }
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Option<Self>, ConfigError> {
        let cert_pem = vars.optional("DASHBOARD_TLS_CERT");
        let key_pem = vars.optional("DASHBOARD_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "DASHBOARD_TLS_*".to_string(),
                "Both DASHBOARD_TLS_CERT and DASHBOARD_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl ShopConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            key: vars.or_default("DASHBOARD_SHOP_KEY", DEFAULT_SHOP_KEY),
            domain: vars.required("SHOPIFY_SHOP")?,
            api_version: vars.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: vars.validated_secret("SHOPIFY_ACCESS_TOKEN")?,
        })
    }
}

impl PickNameField {
    fn from_vars(vars: &Vars<'_>) -> Self {
        let default = Self::default();
        Self {
            namespace: vars.or_default("PICK_NAME_NAMESPACE", &default.namespace),
            key: vars.or_default("PICK_NAME_KEY", &default.key),
        }
    }
}

fn shipping_policy_from_vars(vars: &Vars<'_>) -> ShippingPolicy {
    let pickup_title = vars.or_default("PICKUP_TITLE", PICKUP_TITLE);
    let aliases = vars.optional("PICKUP_ALIASES").map_or_else(
        || DEFAULT_PICKUP_ALIASES.iter().map(ToString::to_string).collect(),
        |raw| split_list(&raw),
    );
    let carriers = vars.optional("HIGHLIGHTED_CARRIERS").map_or_else(
        || {
            DEFAULT_HIGHLIGHTED_CARRIERS
                .iter()
                .map(ToString::to_string)
                .collect()
        },
        |raw| split_list(&raw),
    );
    ShippingPolicy::new(&pickup_title, aliases, carriers)
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let host = vars
            .or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = vars
            .or_default("DASHBOARD_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let fetch_limit = parse_fetch_limit(vars.optional("ORDER_FETCH_LIMIT").as_deref())?;

        let shop = ShopConfig::from_vars(&vars)?;
        let pick_name = PickNameField::from_vars(&vars);
        let shipping = shipping_policy_from_vars(&vars);
        let sentry_dsn = vars.optional("SENTRY_DSN");
        let sentry_environment = vars.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = vars
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = vars
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);
        let tls = TlsConfig::from_vars(&vars)?;

        Ok(Self {
            host,
            port,
            shop,
            fetch_limit,
            pick_name,
            shipping,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source. Blank values count as unset.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable, trimmed.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

fn parse_fetch_limit(raw: Option<&str>) -> Result<u16, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_FETCH_LIMIT);
    };
    let invalid = |reason: String| ConfigError::InvalidEnvVar("ORDER_FETCH_LIMIT".to_string(), reason);
    let limit = raw.parse::<u16>().map_err(|e| invalid(e.to_string()))?;
    if (1..=MAX_FETCH_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(invalid(format!("must be between 1 and {MAX_FETCH_LIMIT}")))
    }
}

/// Split a comma separated list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens are random hex
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token generated by Shopify."
            ),
        ));
    }

    Ok(())
}
