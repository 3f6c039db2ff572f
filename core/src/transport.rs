//! Executes built requests over the network.
//!
//! One call to `execute` is exactly one round trip. There is no retry and no
//! caching here; timeouts are a property of the underlying HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Default timeout for a single round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Performs one HTTP round trip.
///
/// Non-2xx statuses are returned as data, not as errors: the PSN API reports
/// failures in the body, so status interpretation belongs to the parser.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// Use an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Timeout from `PSN_HTTP_TIMEOUT_SECS`, falling back to the default.
    pub fn from_env() -> Result<Self, ApiError> {
        let secs = match std::env::var("PSN_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| ApiError::Config(format!("PSN_HTTP_TIMEOUT_SECS={raw}: {e}")))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Self::with_timeout(Duration::from_secs(secs))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", request.url)))?;
        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
