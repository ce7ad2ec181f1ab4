//! Infogram API credentials.
//!
//! The API secret is only ever used as the HMAC key and is never sent over
//! the wire, so it lives in a `SecretString` that redacts itself from
//! `Debug` output and is zeroed on drop.

use crate::errors::{CoreError, Result};
use log::{debug, error};
use secrecy::{ExposeSecret, SecretString};

pub const API_KEY_ENV: &str = "INFOGRAM_API_KEY";
pub const API_SECRET_ENV: &str = "INFOGRAM_API_SECRET";

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Load credentials from `INFOGRAM_API_KEY` and `INFOGRAM_API_SECRET`.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = read_env(API_KEY_ENV)?;
        let api_secret = read_env(API_SECRET_ENV)?;

        debug!("Loaded Infogram credentials for key {}", mask_key(&api_key));
        Ok(Self::new(api_key, api_secret))
    }

    /// The public API key, sent as `api_key` on every request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The API secret. Only use this as key material for signing.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_key(&self.api_key))
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

fn read_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        error!("{} environment variable not set", name);
        CoreError::Config(format!("{} environment variable not set", name))
    })
}

/// Shorten an API key to its first and last four characters for logging.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
