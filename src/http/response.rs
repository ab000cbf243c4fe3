//! HTTP response type and one-shot body streams
//!
//! Bodies arrive from the transport as one-shot readable streams but must
//! be returnable to the caller and writable to the cache. `Body` models
//! both states: a live stream, or bytes already drained into a replayable
//! buffer.

use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};

/// One-shot response (or request) body.
pub enum Body {
    /// Bytes fully materialized in memory; replayable.
    Buffered(Bytes),
    /// A live byte source that can be read exactly once.
    Stream(Box<dyn Read + Send>),
}

impl Body {
    /// An empty, buffered body.
    #[must_use]
    pub fn empty() -> Self {
        Body::Buffered(Bytes::new())
    }

    /// A buffered body from bytes or a string.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Body::Buffered(bytes.into())
    }

    /// A one-shot body from an arbitrary readable source.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Body::Stream(Box::new(reader))
    }

    /// Drain this body into a replayable buffer. For an already buffered
    /// body this is free; for a stream it reads to the end.
    pub fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Body::Buffered(bytes) => Ok(bytes),
            Body::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }

    /// The buffered bytes, if this body has been drained already.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Buffered(bytes) => Some(bytes),
            Body::Stream(_) => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl Clone for Body {
    fn clone(&self) -> Self {
        match self {
            Body::Buffered(bytes) => Body::Buffered(bytes.clone()),
            // A one-shot stream cannot be duplicated; clones start empty.
            Body::Stream(_) => Body::empty(),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Buffered(bytes) => f
                .debug_tuple("Buffered")
                .field(&format!("{} bytes", bytes.len()))
                .finish(),
            Body::Stream(_) => f.debug_tuple("Stream").field(&"<one-shot>").finish(),
        }
    }
}

/// HTTP response with status, reason phrase, protocol version, multi-valued
/// headers, and a one-shot body.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    status: StatusCode,
    reason: Option<String>,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl HttpResponse {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: None,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// Set an explicit reason phrase. Without one, the status code's
    /// canonical reason is used.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Append a header. Invalid names or values are dropped with a warning.
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
                    "dropping invalid response header"
                );
            }
        }
        self
    }

    /// Insert a header, replacing any existing values for the same name.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase: the explicit one if set, else the canonical phrase
    /// for the status code, else the empty string.
    pub fn reason(&self) -> &str {
        match self.reason {
            Some(ref reason) => reason,
            None => self.status.canonical_reason().unwrap_or(""),
        }
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

    /// Take the body out, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    /// Consume the response, yielding its body.
    pub fn into_body(self) -> Body {
        self.body
    }

    /// All readable values for `name`, one entry per header line.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// First readable value for `name`, if present and non-empty.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}
