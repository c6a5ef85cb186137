//! HTTP transport abstraction.
//!
//! The resolver only needs "GET a URL, return status + body". That capability
//! is the [`HttpTransport`] trait; [`ReqwestTransport`] is the production
//! implementation, and tests plug in their own.

mod reqwest_transport;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

pub use reqwest_transport::ReqwestTransport;

/// Outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// Header names are stored lower-case.
    pub headers: BTreeMap<String, String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Response status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure to obtain any response (connection, timeout, body read).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Transport used by the resolver for every upstream call.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use nbp_rates::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
///
/// struct Offline;
///
/// #[async_trait]
/// impl HttpTransport for Offline {
///     async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::new(404, "Not Found"))
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
