//! Error types and suppression classification for the NBP client.
//!
//! This module provides [`NbpError`], the single error enum returned by every
//! operation in the crate, together with [`NbpError::is_suppressible`], which
//! decides whether a failure may be turned into a "no result" outcome when a
//! client is configured with `suppress_errors`.

use thiserror::Error;

/// Errors that can occur while resolving exchange rates.
///
/// The enum is `Clone` so that a single failed upstream call can be handed to
/// every caller waiting on the same cache entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NbpError {
    /// The currency code is not present in the registry.
    /// Raised at client construction or when the code is changed, never
    /// deferred to a network call.
    #[error("Unknown currency code: {0}")]
    UnknownCurrencyCode(String),

    /// A date argument is not a valid `YYYY-MM-DD` calendar date.
    /// Raised before any network activity.
    #[error("{0} is not a properly formatted date (YYYY-MM-DD)")]
    DateFormatting(String),

    /// Bid/ask rates were requested for a currency without table C.
    #[error("Bid/ask rates are not available for {0}")]
    BidAskUnavailable(String),

    /// The upstream API failed: transport error, non-2xx status or a body
    /// that could not be interpreted.
    #[error("API error: {message}")]
    Api {
        /// HTTP status, when a response was received at all
        status: Option<u16>,
        /// Upstream detail
        message: String,
    },

    /// The upstream returned no rate entries for a query that needs one.
    #[error("No exchange rate data for {code} ({query})")]
    MissingData {
        /// Currency code of the query
        code: String,
        /// Human readable query description
        query: String,
    },

    /// An exchange rate record could not be built from the given values.
    #[error("Invalid exchange rate record: {0}")]
    InvalidRecord(String),

    /// Client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NbpError {
    /// Shorthand for an [`NbpError::Api`] without an HTTP status.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Shorthand for an [`NbpError::Api`] carrying the HTTP status.
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Returns `true` for environmental failures that a client configured
    /// with `suppress_errors` converts into a "no result" value.
    ///
    /// Programmer errors in the call itself (unknown code, malformed date,
    /// bad configuration) are never suppressed, and neither is
    /// [`NbpError::MissingData`].
    ///
    /// # Examples
    ///
    /// ```
    /// use nbp_rates::NbpError;
    ///
    /// assert!(NbpError::api_status(404, "Not Found").is_suppressible());
    /// assert!(!NbpError::DateFormatting("2017-15-01".to_string()).is_suppressible());
    /// ```
    pub fn is_suppressible(&self) -> bool {
        match self {
            Self::BidAskUnavailable(_) | Self::Api { .. } => true,

            Self::UnknownCurrencyCode(_)
            | Self::DateFormatting(_)
            | Self::MissingData { .. }
            | Self::InvalidRecord(_)
            | Self::InvalidConfig(_) => false,
        }
    }

    /// HTTP status of an upstream failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_ask_unavailable_is_suppressible() {
        let error = NbpError::BidAskUnavailable("THB".to_string());
        assert!(error.is_suppressible());
    }

    #[test]
    fn test_api_error_is_suppressible() {
        assert!(NbpError::api("connection refused").is_suppressible());
        assert!(NbpError::api_status(400, "Bad Request").is_suppressible());
    }

    #[test]
    fn test_programmer_errors_are_never_suppressed() {
        assert!(!NbpError::UnknownCurrencyCode("XXX".to_string()).is_suppressible());
        assert!(!NbpError::DateFormatting(String::new()).is_suppressible());
        assert!(!NbpError::InvalidConfig("cache".to_string()).is_suppressible());
    }

    #[test]
    fn test_missing_data_is_not_suppressed() {
        let error = NbpError::MissingData {
            code: "USD".to_string(),
            query: "today".to_string(),
        };
        assert!(!error.is_suppressible());
    }

    #[test]
    fn test_status() {
        assert_eq!(NbpError::api_status(404, "Not Found").status(), Some(404));
        assert_eq!(NbpError::api("timeout").status(), None);
        assert_eq!(NbpError::BidAskUnavailable("THB".into()).status(), None);
    }

    #[test]
    fn test_error_display() {
        let error = NbpError::UnknownCurrencyCode("XXX".to_string());
        assert_eq!(format!("{}", error), "Unknown currency code: XXX");

        let error = NbpError::DateFormatting("01/02/2017".to_string());
        assert_eq!(
            format!("{}", error),
            "01/02/2017 is not a properly formatted date (YYYY-MM-DD)"
        );

        let error = NbpError::api_status(404, "HTTP 404 Not Found");
        assert_eq!(format!("{}", error), "API error: HTTP 404 Not Found");
    }
}
