//! # Infogram Core
//!
//! Core logic for the Infogram API client.
//!
//! This crate contains everything that does not touch the network:
//! - Resource models (infographics, themes) and their JSON codecs
//! - Error definitions
//! - API credentials
//! - The request value type and the request signer
//!
//! ## Design Principles
//!
//! - **Pure Functions**: signing is deterministic and easy to test against golden values
//! - **Strongly Typed**: resource payloads are validated field by field on decode
//! - **Dependency-Free**: no I/O, networking, or runtime dependencies

pub mod credentials;
pub mod decode;
pub mod errors;
pub mod models;
pub mod request;
pub mod signing;

// Re-export commonly used types
pub use credentials::{mask_key, Credentials};
pub use errors::{CoreError, FieldError, Result, SignError};
pub use models::{ExportFormat, Infographic, Theme};
pub use request::{encode_path_segment, ApiRequest, Method, RequestBody};
pub use signing::{
    DigestEncoding, ParamSet, Signer, SigningPolicy, UrlScope, API_KEY_PARAM, API_SIG_PARAM,
};
