use crate::errors::{ApiError, TransportError};
use infogram_core::{ApiRequest, Method};
use log::{debug, error};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Executes signed requests.
///
/// Implementations must read the whole response body and release the
/// underlying connection before returning.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `Transport` backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_default_timeout() -> Result<Self, ApiError> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Wrap a caller-configured client (proxies, TLS roots, timeouts).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let (method, url, headers, body) = request.into_parts();
        debug!("HTTP {} request to: {}", method, url.path());

        let mut builder = self.client.request(to_reqwest_method(method), url);

        let has_content_type = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            if let (false, Some(content_type)) = (has_content_type, body.content_type()) {
                builder = builder.header("Content-Type", content_type);
            }
            builder = builder.body(body.to_bytes());
        }

        let response = builder.send().await.map_err(|e| {
            error!("{} request failed: {:?}", method, e);
            TransportError::from(e)
        })?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        // Consumes the response, returning the connection to the pool.
        let body = response.bytes().await.map_err(TransportError::from)?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
