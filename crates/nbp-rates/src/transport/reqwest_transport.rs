use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Proxy};

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::config::{ProxyConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::errors::NbpError;

const USER_AGENT: &str = concat!("nbp-rates/", env!("CARGO_PKG_VERSION"));

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport with the default timeout and no proxy.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Transport honouring proxy settings and a request timeout.
    pub fn with_options(proxy: &ProxyConfig, timeout: Duration) -> Result<Self, NbpError> {
        let mut builder = Client::builder().timeout(timeout).user_agent(USER_AGENT);

        if let Some(url) = &proxy.http {
            let http = Proxy::http(url)
                .map_err(|e| NbpError::InvalidConfig(format!("invalid HTTP proxy: {}", e)))?;
            builder = builder.proxy(http);
        }
        if let Some(url) = &proxy.https {
            let https = Proxy::https(url)
                .map_err(|e| NbpError::InvalidConfig(format!("invalid HTTPS proxy: {}", e)))?;
            builder = builder.proxy(https);
        }

        let client = builder
            .build()
            .map_err(|e| NbpError::InvalidConfig(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("GET {}", request.url);

        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::new(format!("request timeout: {}", e))
            } else if e.is_connect() {
                TransportError::new(format!("connection failed: {}", e))
            } else {
                TransportError::new(format!("request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
