//! # infogram
//!
//! Client library for the Infogram REST API.
//!
//! ```rust,ignore
//! use infogram::{Credentials, Infogram};
//!
//! let sdk = Infogram::new(Credentials::new(api_key, api_secret))?;
//! for theme in sdk.themes().await? {
//!     println!("{}: {}", theme.id, theme.title);
//! }
//! ```

pub use infogram_api as api;

// Re-export main public types
pub use infogram_api::{
    ApiError, CancelReason, CancellationToken, ClientConfig, EnvConfig, HttpTransport, Infogram,
    InfogramClient, InfogramConfig, InfographicExport, RawResponse, RequestContext, Result,
    Transport, TransportError, DEFAULT_ENDPOINT,
};
pub use infogram_core::{
    ApiRequest, Credentials, DigestEncoding, ExportFormat, Infographic, Method, RequestBody,
    Signer, SigningPolicy, Theme, UrlScope, API_KEY_PARAM, API_SIG_PARAM,
};
