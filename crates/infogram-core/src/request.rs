//! Outgoing request representation.
//!
//! An `ApiRequest` is built fresh for every call, signed in place and then
//! moved into the transport, so its body can only ever be consumed once.

use crate::errors::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Everything except the RFC 3986 unreserved characters gets percent-encoded.
pub(crate) const STRICT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Read-style methods carry their parameters in the query string,
    /// write-style methods in a form-encoded body.
    pub fn is_read_style(&self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    /// Pre-serialized JSON payload.
    Json(Vec<u8>),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Empty => true,
            RequestBody::Form(pairs) => pairs.is_empty(),
            RequestBody::Json(bytes) => bytes.is_empty(),
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(_) => Some(FORM_CONTENT_TYPE),
            RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    /// Serialize the body to the bytes that go on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            RequestBody::Empty => Vec::new(),
            RequestBody::Form(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish()
                .into_bytes(),
            RequestBody::Json(bytes) => bytes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Parse `url` and build a request for it.
    pub fn parse(method: Method, url: &str) -> Result<Self> {
        Ok(Self::new(method, Url::parse(url)?))
    }

    /// Append query parameters to the target URL.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        if !pairs.is_empty() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Replace the body with form-encoded parameters.
    pub fn with_form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Replace the body with `body` serialized as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_vec(body)?);
        Ok(self.with_header("Content-Type", JSON_CONTENT_TYPE))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// First decoded query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// First form body parameter named `name`.
    pub fn form_param(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (Method, Url, Vec<(String, String)>, RequestBody) {
        (self.method, self.url, self.headers, self.body)
    }

    pub(crate) fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    pub(crate) fn set_body(&mut self, body: RequestBody) {
        self.body = body;
    }
}

/// Percent-encode an identifier so it stays a single path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, STRICT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://infogr.am/service/v1/infographics").unwrap()
    }

    #[test]
    fn test_method_style() {
        assert!(Method::Get.is_read_style());
        assert!(Method::Delete.is_read_style());
        assert!(!Method::Post.is_read_style());
        assert!(!Method::Put.is_read_style());
        assert_eq!(Method::Put.to_string(), "PUT");
    }

    #[test]
    fn test_simple_request_has_no_body() {
        let request = ApiRequest::get(base());

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.header("Content-Type"), None);
        assert!(request.body().is_empty());
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_query_params() {
        let request = ApiRequest::get(base()).with_query([("id", "1"), ("label", "new label")]);

        assert_eq!(request.query_param("id").as_deref(), Some("1"));
        assert_eq!(request.query_param("label").as_deref(), Some("new label"));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_empty_query_leaves_url_untouched() {
        let request = ApiRequest::get(base()).with_query(Vec::<(&str, &str)>::new());
        assert_eq!(request.url().as_str(), "https://infogr.am/service/v1/infographics");
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Sample<'a> {
            id: &'a str,
            label: &'a str,
        }

        let request = ApiRequest::new(Method::Post, base())
            .with_json(&Sample {
                id: "123",
                label: "New Label",
            })
            .unwrap();

        assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));
        let body: serde_json::Value = serde_json::from_slice(&request.body().to_bytes()).unwrap();
        assert_eq!(body, serde_json::json!({"id": "123", "label": "New Label"}));
    }

    #[test]
    fn test_form_body_encoding() {
        let request =
            ApiRequest::new(Method::Put, base()).with_form([("title", "Q3 results"), ("a&b", "c=d")]);

        assert_eq!(request.form_param("title"), Some("Q3 results"));
        assert_eq!(request.body().content_type(), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            request.body().to_bytes(),
            b"title=Q3+results&a%26b=c%3Dd".to_vec()
        );
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("12345"), "12345");
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("x-y_z.~"), "x-y_z.~");
    }
}
