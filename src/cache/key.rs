//! Cache key derivation
//!
//! Two keys exist per URI: a settings key, and a response key qualified by
//! the Vary projection and the private-scope token. The digest scheme is
//! pluggable but cache-wide: changing it orphans every existing entry, so
//! the default is stable across releases.

use std::collections::BTreeMap;

use md5::Md5;
use sha1::{Digest, Sha1};

use crate::http::HttpRequest;

/// Derives the backend keys for settings and response blobs.
///
/// Implementations must be deterministic and stable across restarts; any
/// well-distributed digest of at least 160 bits is acceptable.
pub trait CacheKeyFactory: Send + Sync {
    /// Key of the per-URI settings blob.
    fn settings_key(&self, uri: &str) -> String;

    /// Key of the response blob for one (URI, Vary projection, private
    /// token) tuple.
    fn response_key(
        &self,
        uri: &str,
        vary: &BTreeMap<String, String>,
        private_token: Option<&str>,
    ) -> String;
}

/// Default key factory: `H(s) = hex(sha1(s)) ‖ hex(md5(s))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyFactory;

impl DefaultKeyFactory {
    fn digest(input: &str) -> String {
        let sha = Sha1::digest(input.as_bytes());
        let md = Md5::digest(input.as_bytes());
        format!("{}{}", hex::encode(sha), hex::encode(md))
    }
}

impl CacheKeyFactory for DefaultKeyFactory {
    fn settings_key(&self, uri: &str) -> String {
        format!("http.settings.{}", Self::digest(uri))
    }

    fn response_key(
        &self,
        uri: &str,
        vary: &BTreeMap<String, String>,
        private_token: Option<&str>,
    ) -> String {
        let scope = match private_token {
            Some(token) => format!("private_{}", Self::digest(token)),
            None => "public".to_string(),
        };

        let vary_suffix = if vary.is_empty() {
            String::new()
        } else {
            let joined = vary
                .iter()
                .map(|(name, value)| format!("{name}:{value}"))
                .collect::<Vec<_>>()
                .join(",");
            format!("_{}", Self::digest(&joined))
        };

        format!("http.response.{}_{}{}", scope, Self::digest(uri), vary_suffix)
    }
}

/// Project a request onto a stored `Vary` list: `{name → header line}`,
/// names lowercased and ordered lexicographically, absent headers
/// contributing the empty string.
#[must_use]
pub fn vary_projection(request: &HttpRequest, vary: &[String]) -> BTreeMap<String, String> {
    vary.iter()
        .filter(|name| name.as_str() != "*")
        .map(|name| (name.to_lowercase(), request.header_line(name)))
        .collect()
}
