use infogram_core::{CoreError, SignError};
use std::fmt;
use thiserror::Error;

/// API-specific errors for infogram-api
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Signing error: {0}")]
    Sign(#[from] SignError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request cancelled: {0}")]
    Cancelled(CancelReason),

    /// Non-2xx response. Displays as the response body, verbatim.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled(_))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Sign(e) => ApiError::Sign(e),
            CoreError::InvalidUrl(e) => ApiError::InvalidUrl(e),
            CoreError::Json(e) => ApiError::Request(e.to_string()),
            CoreError::Decode(e) => ApiError::Request(e.to_string()),
            CoreError::Config(msg) => ApiError::Config(msg),
        }
    }
}

/// Errors raised while moving bytes over the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Why a call was aborted before the transport returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => f.write_str("context cancelled"),
            CancelReason::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
