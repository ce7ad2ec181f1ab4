//! # Infogram API
//!
//! Signed HTTP client for the Infogram REST API.
//! Every request is signed with the caller's API key and secret, sent
//! through a pluggable [`Transport`], and its response either decoded from
//! JSON or copied verbatim into a writer.

pub mod client;
pub mod config;
pub mod context;
pub mod errors;
pub mod sdk;
pub mod transport;

// Re-export common types for convenience
pub use client::*;
pub use config::*;
pub use context::*;
pub use errors::*;
pub use sdk::*;
pub use transport::*;

// Re-export core types that API consumers will need
pub use infogram_core::{
    Credentials, DigestEncoding, ExportFormat, Infographic, Method, SigningPolicy, Theme,
    UrlScope,
};
pub use tokio_util::sync::CancellationToken;
