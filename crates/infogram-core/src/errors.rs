use thiserror::Error;

/// Core errors - no I/O dependencies
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Signing error: {0}")]
    Sign(#[from] SignError),

    #[error("Decode error: {0}")]
    Decode(#[from] FieldError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// The request already carries an `api_sig` parameter.
    #[error("request is already signed")]
    AlreadySigned,

    #[error("API secret cannot be used as an HMAC key")]
    InvalidKey,
}

/// A resource field whose JSON value had the wrong type or format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} needs to be {expected}")]
pub struct FieldError {
    pub field: &'static str,
    pub expected: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, expected: &'static str) -> Self {
        Self { field, expected }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
