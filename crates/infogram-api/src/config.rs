use crate::errors::Result;
use crate::transport::HttpTransport;
use infogram_core::{Credentials, SigningPolicy};
use log::debug;

/// Default API endpoint for Infogram
pub const DEFAULT_ENDPOINT: &str = "https://infogr.am/service/v1";

pub const ENDPOINT_ENV: &str = "INFOGRAM_ENDPOINT";

/// Recognized client options. Anything left as `None` falls back to its
/// default when the client is constructed.
#[derive(Debug, Clone)]
pub struct ClientConfig<T = HttpTransport> {
    /// HTTP transport override.
    pub transport: Option<T>,
    /// Base URL override.
    pub endpoint: Option<String>,
    pub signing: SigningPolicy,
}

impl<T> Default for ClientConfig<T> {
    fn default() -> Self {
        Self {
            transport: None,
            endpoint: None,
            signing: SigningPolicy::default(),
        }
    }
}

impl<T> ClientConfig<T> {
    /// Read the endpoint override from `INFOGRAM_ENDPOINT`, loading `.env`
    /// first if present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        if let Some(ref url) = endpoint {
            debug!("Using endpoint from {}: {}", ENDPOINT_ENV, url);
        }

        Self {
            endpoint,
            ..Self::default()
        }
    }

    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_signing(mut self, signing: SigningPolicy) -> Self {
        self.signing = signing;
        self
    }
}

/// Trait for providing configuration to the API client
/// This allows an application to feed credentials from its own config store
pub trait InfogramConfig {
    type Error: From<crate::errors::ApiError>;

    /// Get the API credentials
    fn credentials(&self) -> std::result::Result<Credentials, Self::Error>;

    /// Get the base URL for the API (optional, defaults to the public endpoint)
    fn endpoint(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// Environment-backed configuration: `INFOGRAM_API_KEY`,
/// `INFOGRAM_API_SECRET` and optionally `INFOGRAM_ENDPOINT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl InfogramConfig for EnvConfig {
    type Error = crate::errors::ApiError;

    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::from_env()?)
    }

    fn endpoint(&self) -> Result<Option<String>> {
        Ok(ClientConfig::<HttpTransport>::from_env().endpoint)
    }
}
