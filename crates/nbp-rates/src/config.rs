//! Client configuration.
//!
//! A [`ClientConfig`] is built in code with the `with_*` methods or read from
//! the environment with [`ClientConfig::from_env`]:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `NBP_CURRENCY` | currency code (required) | |
//! | `NBP_AS_FLOAT` | use `f64` instead of `Decimal` | `false` |
//! | `NBP_SUPPRESS_ERRORS` | turn upstream failures into "no result" | `false` |
//! | `NBP_CACHE_SIZE` | request cache capacity | `128` |
//! | `NBP_HTTP_PROXY` / `NBP_HTTPS_PROXY` | outbound proxies | none |
//! | `NBP_BASE_URL` | API root | `https://api.nbp.pl/api` |
//! | `NBP_TIMEOUT_MS` | request timeout | `30000` |

use std::time::Duration;

use crate::errors::NbpError;
use crate::models::NumericMode;

pub const DEFAULT_BASE_URL: &str = "https://api.nbp.pl/api";
pub const DEFAULT_CACHE_CAPACITY: u64 = 128;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound proxy URLs, per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Same proxy for both schemes.
    pub fn all(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            http: Some(url.clone()),
            https: Some(url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Settings fixed at client construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub currency_code: String,
    /// Values are `f64` when set, `Decimal` otherwise.
    pub use_floating_point: bool,
    /// Convert bid/ask-unavailable and upstream failures into `Ok(None)`.
    pub suppress_errors: bool,
    /// Maximum number of cached query results.
    pub cache_capacity: u64,
    pub proxy: ProxyConfig,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(currency_code: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            use_floating_point: false,
            suppress_errors: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            proxy: ProxyConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_floating_point(mut self, use_floating_point: bool) -> Self {
        self.use_floating_point = use_floating_point;
        self
    }

    pub fn with_suppress_errors(mut self, suppress_errors: bool) -> Self {
        self.suppress_errors = suppress_errors;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: u64) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn numeric_mode(&self) -> NumericMode {
        NumericMode::from_floating_point(self.use_floating_point)
    }

    /// Checks everything except the currency code, which is validated
    /// against a registry by the client.
    pub fn validate(&self) -> Result<(), NbpError> {
        if self.cache_capacity == 0 {
            return Err(NbpError::InvalidConfig(
                "cache capacity must be positive".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(NbpError::InvalidConfig("base URL is empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(NbpError::InvalidConfig(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the configuration from `NBP_*` environment variables, loading a
    /// `.env` file first when present.
    pub fn from_env() -> Result<Self, NbpError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NbpError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let currency_code = var("NBP_CURRENCY")
            .ok_or_else(|| NbpError::InvalidConfig("NBP_CURRENCY is not set".to_string()))?;
        let mut config = Self::new(currency_code);

        if let Some(value) = var("NBP_AS_FLOAT") {
            config.use_floating_point = parse_flag("NBP_AS_FLOAT", &value)?;
        }
        if let Some(value) = var("NBP_SUPPRESS_ERRORS") {
            config.suppress_errors = parse_flag("NBP_SUPPRESS_ERRORS", &value)?;
        }
        if let Some(value) = var("NBP_CACHE_SIZE") {
            config.cache_capacity = value.parse().map_err(|_| {
                NbpError::InvalidConfig(format!("NBP_CACHE_SIZE: '{}' is not a number", value))
            })?;
        }
        if let Some(value) = var("NBP_TIMEOUT_MS") {
            let millis: u64 = value.parse().map_err(|_| {
                NbpError::InvalidConfig(format!("NBP_TIMEOUT_MS: '{}' is not a number", value))
            })?;
            config.request_timeout = Duration::from_millis(millis);
        }
        if let Some(value) = var("NBP_BASE_URL") {
            config.base_url = value;
        }
        config.proxy = ProxyConfig {
            http: var("NBP_HTTP_PROXY"),
            https: var("NBP_HTTPS_PROXY"),
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, NbpError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NbpError::InvalidConfig(format!(
            "{}: '{}' is not a boolean",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("usd");
        assert_eq!(config.currency_code, "usd");
        assert!(!config.use_floating_point);
        assert!(!config.suppress_errors);
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.proxy.is_empty());
        assert_eq!(config.numeric_mode(), NumericMode::Decimal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("EUR")
            .with_floating_point(true)
            .with_suppress_errors(true)
            .with_cache_capacity(16)
            .with_proxy(ProxyConfig::all("http://10.10.1.10:3128"))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.numeric_mode(), NumericMode::Float);
        assert!(config.suppress_errors);
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.proxy.https.as_deref(), Some("http://10.10.1.10:3128"));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = ClientConfig::new("USD")
            .with_cache_capacity(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, NbpError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("NBP_CURRENCY", "chf"),
            ("NBP_AS_FLOAT", "true"),
            ("NBP_SUPPRESS_ERRORS", "1"),
            ("NBP_CACHE_SIZE", "32"),
            ("NBP_TIMEOUT_MS", "1500"),
            ("NBP_HTTPS_PROXY", "http://10.10.1.10:1080"),
        ]))
        .unwrap();

        assert_eq!(config.currency_code, "chf");
        assert!(config.use_floating_point);
        assert!(config.suppress_errors);
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.proxy.http, None);
        assert_eq!(config.proxy.https.as_deref(), Some("http://10.10.1.10:1080"));
    }

    #[test]
    fn test_from_lookup_requires_currency() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, NbpError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[
            ("NBP_CURRENCY", "USD"),
            ("NBP_AS_FLOAT", "maybe"),
        ]))
        .is_err());
        assert!(ClientConfig::from_lookup(lookup(&[
            ("NBP_CURRENCY", "USD"),
            ("NBP_CACHE_SIZE", "0"),
        ]))
        .is_err());
    }
}
