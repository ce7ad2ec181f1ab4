//! HMAC-SHA1 request signing for the Infogram API.
//!
//! Every request carries two extra parameters: `api_key` and `api_sig`. The
//! signature is computed over a canonical string built from the HTTP method,
//! the request URL and the sorted parameter set:
//!
//! ```text
//! METHOD&pct(URL)&pct(k1=v1&k2=v2...)
//! ```
//!
//! where keys and values are percent-encoded (RFC 3986 unreserved set)
//! before being joined, and the whole parameter string is encoded once more.

use crate::credentials::Credentials;
use crate::errors::SignError;
use crate::request::{ApiRequest, RequestBody, STRICT_ENCODE_SET};
use base64::Engine;
use hmac::{Hmac, Mac};
use log::{debug, trace};
use percent_encoding::utf8_percent_encode;
use sha1::Sha1;
use std::collections::BTreeMap;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

pub const API_KEY_PARAM: &str = "api_key";
pub const API_SIG_PARAM: &str = "api_sig";

/// How the raw HMAC digest is rendered into `api_sig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigestEncoding {
    #[default]
    Base64,
    Hex,
}

/// Which part of the request URL goes into the canonical string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlScope {
    /// Scheme, host and path. Query and fragment are dropped.
    #[default]
    FullUrl,
    PathOnly,
}

/// Signing variant. The default (base64 over the full URL) is what the
/// Infogram service documents; the two variants are not interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningPolicy {
    pub digest: DigestEncoding,
    pub url_scope: UrlScope,
}

impl SigningPolicy {
    pub fn new(digest: DigestEncoding, url_scope: UrlScope) -> Self {
        Self { digest, url_scope }
    }
}

/// Request parameters with unique keys, iterated in byte-wise order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    params: BTreeMap<String, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the parameters a request will be signed over: the query string
    /// for read-style methods and JSON bodies, the form body otherwise.
    pub fn from_request(request: &ApiRequest) -> Self {
        source_pairs(request).into_iter().collect()
    }

    /// Insert or overwrite `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `pct(k)=pct(v)` pairs joined by `&`, in key order.
    pub fn to_canonical_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Repeated keys keep their first value.
impl<K, V> FromIterator<(K, V)> for ParamSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = BTreeMap::new();
        for (k, v) in iter {
            params.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { params }
    }
}

/// Signs requests with a set of credentials.
pub struct Signer<'a> {
    credentials: &'a Credentials,
    policy: SigningPolicy,
}

impl<'a> Signer<'a> {
    pub fn new(credentials: &'a Credentials, policy: SigningPolicy) -> Self {
        Self {
            credentials,
            policy,
        }
    }

    pub fn policy(&self) -> SigningPolicy {
        self.policy
    }

    /// Add `api_key` and `api_sig` to the request.
    ///
    /// Parameters are written back where they were read from. A write-style
    /// request with a JSON body keeps its parameters in the query string.
    ///
    /// Only the first value of a repeated key is signed. Later values are
    /// still sent, right after the signed one.
    pub fn sign(&self, request: &mut ApiRequest) -> Result<(), SignError> {
        let source = source_pairs(request);
        let mut params: ParamSet = source.iter().cloned().collect();
        if params.contains(API_SIG_PARAM) {
            return Err(SignError::AlreadySigned);
        }

        params.set(API_KEY_PARAM, self.credentials.api_key());

        let canonical = self.canonical_string(request.method().as_str(), request.url(), &params);
        let signature = self.signature(&canonical)?;
        params.set(API_SIG_PARAM, signature);

        let pairs = write_back_pairs(&params, &source);
        if params_in_query(request) {
            let url = request.url_mut();
            url.set_query(None);
            url.query_pairs_mut().extend_pairs(pairs);
        } else {
            request.set_body(RequestBody::Form(pairs));
        }

        debug!(
            "Signed {} {} ({} parameters)",
            request.method(),
            request.url().path(),
            params.len()
        );
        Ok(())
    }

    /// The exact string the signature is computed over.
    pub fn canonical_string(&self, method: &str, url: &Url, params: &ParamSet) -> String {
        let target = match self.policy.url_scope {
            UrlScope::FullUrl => {
                let mut stripped = url.clone();
                stripped.set_query(None);
                stripped.set_fragment(None);
                stripped.to_string()
            }
            UrlScope::PathOnly => url.path().to_string(),
        };

        let canonical = format!(
            "{}&{}&{}",
            method,
            percent_encode(&target),
            percent_encode(&params.to_canonical_string())
        );
        trace!("Canonical signing string: {}", canonical);
        canonical
    }

    /// HMAC-SHA1 of `canonical` keyed with the API secret, encoded per policy.
    pub fn signature(&self, canonical: &str) -> Result<String, SignError> {
        let mut mac = HmacSha1::new_from_slice(self.credentials.expose_secret().as_bytes())
            .map_err(|_| SignError::InvalidKey)?;
        mac.update(canonical.as_bytes());
        let digest = mac.finalize().into_bytes();

        Ok(match self.policy.digest {
            DigestEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(digest),
            DigestEncoding::Hex => hex::encode(digest),
        })
    }
}

fn params_in_query(request: &ApiRequest) -> bool {
    request.method().is_read_style() || matches!(request.body(), RequestBody::Json(_))
}

fn source_pairs(request: &ApiRequest) -> Vec<(String, String)> {
    if params_in_query(request) {
        return request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    }

    match request.body() {
        RequestBody::Form(pairs) => pairs.clone(),
        _ => Vec::new(),
    }
}

/// Signed parameters in key order, each followed by any repeated values the
/// request carried for it. Caller-supplied `api_key` values are dropped.
fn write_back_pairs(params: &ParamSet, source: &[(String, String)]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(source.len() + 2);
    for (key, value) in params.iter() {
        pairs.push((key.to_string(), value.to_string()));
        if key == API_KEY_PARAM {
            continue;
        }
        pairs.extend(source.iter().filter(|(k, _)| k == key).skip(1).cloned());
    }
    pairs
}

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, STRICT_ENCODE_SET).to_string()
}
