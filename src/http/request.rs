//! HTTP request type
//!
//! This module provides the canonical `HttpRequest` used on both sides of
//! the decorator: the caller hands one in, and (possibly stripped or
//! extended with conditional headers) the same shape is forwarded to the
//! wrapped client.

use http::{HeaderMap, HeaderName, HeaderValue, Method, Version};
use url::Url;

use super::response::Body;

/// HTTP request with multi-valued, case-insensitive, order-preserving
/// headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl HttpRequest {
    /// Create a request with the given method and URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// Create a GET request for the given URL.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Append a header. Invalid names or values are dropped with a warning
    /// rather than failing the request.
    #[must_use]
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => {
                tracing::warn!(
                    target: "hoard::http",
                    "dropping invalid request header"
                );
            }
        }
        self
    }

    /// Set the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Clone of this request with every value of `name` removed.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        if let Ok(name) = HeaderName::try_from(name) {
            while self.headers.remove(&name).is_some() {}
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Whether at least one value is present for `name`.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// All values for `name` joined with `", "`, or the empty string when
    /// the header is absent. This is the form the Vary projection consumes.
    pub fn header_line(&self, name: &str) -> String {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// All readable values for `name`, one entry per header line.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}
