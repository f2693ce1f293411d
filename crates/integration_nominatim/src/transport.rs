//! HTTP transport seam
//!
//! The geocoding client only assembles the request and interprets the
//! answer; issuing the GET is delegated to an [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Transport-level failure: no HTTP response was obtained
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be built
    #[error("HTTP client initialization failed: {0}")]
    Init(String),

    /// Connecting or sending the request failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// A fully assembled GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Target URL including the encoded query string
    pub url: Url,
    /// User-Agent header value
    pub user_agent: String,
    /// Optional basic-auth user name and password
    pub credentials: Option<(String, String)>,
}

/// Raw HTTP result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body (may be empty)
    pub body: String,
}

/// Issues HTTP GET requests on behalf of the geocoding client
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request and return status and body
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Init(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .get(request.url.clone())
            .header(reqwest::header::USER_AGENT, &request.user_agent)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some((username, password)) = &request.credentials {
            builder = builder.basic_auth(username, Some(password));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(status, bytes = body.len(), "Received geocoding response");

        Ok(TransportResponse { status, body })
    }
}
