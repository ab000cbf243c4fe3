//! Caching decorator client
//!
//! `CachingClient` wraps any `HttpClient` and interposes a shared cache
//! between caller and origin: it classifies requests (bypass vs.
//! cacheable), applies freshness and revalidation rules against the
//! stored per-URI settings, and admits origin responses through the
//! storability filter. Any internal anomaly degrades to forwarding; the
//! only caller-visible errors are the ones the wrapped client raises.

use std::sync::Arc;

use http::{header, HeaderValue, Method, StatusCode, Version};

use crate::cache::admission::{self, StorePlan};
use crate::cache::directives::CacheControl;
use crate::cache::envelope;
use crate::cache::key::{vary_projection, CacheKeyFactory, DefaultKeyFactory};
use crate::cache::settings::CacheSettings;
use crate::cache::CacheBackend;
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::http::date::{epoch_now, format_http_date};
use crate::http::{Body, HttpRequest, HttpResponse};

/// A synchronous HTTP client: one request in, one response out.
///
/// The decorator consumes the wrapped client only through this operation;
/// it exposes the same shape itself.
pub trait HttpClient: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Transparent caching decorator around an `HttpClient`.
pub struct CachingClient<C> {
    client: C,
    backend: Arc<dyn CacheBackend>,
    keys: Arc<dyn CacheKeyFactory>,
    config: CacheConfig,
}

impl<C: HttpClient> CachingClient<C> {
    /// Wrap `client` with the default key factory and configuration.
    pub fn new(client: C, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            client,
            backend,
            keys: Arc::new(DefaultKeyFactory),
            config: CacheConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_key_factory(mut self, keys: Arc<dyn CacheKeyFactory>) -> Self {
        self.keys = keys;
        self
    }

    /// Send a request, serving from cache when the stored representation
    /// is usable, revalidating or forwarding to the origin otherwise.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        if let Some(reason) = bypass_reason(&request) {
            tracing::debug!(
                target: "hoard::client",
                url = %request.url(),
                reason,
                "bypassing cache"
            );
            return self.client.send(self.strip_private(request));
        }
        self.dispatch(request)
    }

    /// The cacheable-path decision engine. Steps run top to bottom; the
    /// first terminal action returns.
    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let now = epoch_now();
        let uri = request.url().to_string();
        let settings_key = self.keys.settings_key(&uri);

        let settings = self
            .backend_get(&settings_key)
            .and_then(|blob| CacheSettings::from_json(&blob));

        let Some(settings) = settings else {
            tracing::debug!(target: "hoard::client", url = %uri, "no cache settings; forwarding");
            return self.forward_and_store(&request, now);
        };

        // Re-admission may succeed if the latest origin response is now
        // storable, so no-store still goes through the store path.
        if settings.cache_control.no_store {
            return self.forward_and_store(&request, now);
        }

        if settings.vary.iter().any(|name| name == "*") {
            tracing::debug!(target: "hoard::client", url = %uri, "stored Vary: *; forwarding uncached");
            return self.forward_only(&request);
        }

        if settings.expires.is_some_and(|expires| expires < now) {
            tracing::debug!(target: "hoard::client", url = %uri, "stored representation expired");
            return self.forward_and_store(&request, now);
        }

        // Request-side freshness constraints; both need the stored date.
        let request_cc = CacheControl::parse(request.header_values("cache-control"));
        if let Some(date) = settings.date {
            let age = now - date;
            if request_cc.max_age.is_some_and(|max_age| age > max_age) {
                return self.forward_and_store(&request, now);
            }
            if let (Some(min_fresh), Some(stored_max_age)) =
                (request_cc.min_fresh, settings.cache_control.max_age)
            {
                if stored_max_age < age + min_fresh {
                    return self.forward_and_store(&request, now);
                }
            }
        }

        let private_scoped =
            settings.cache_control.private || request.has_header("authorization");
        let token = if private_scoped {
            match admission::private_header_token(&request, &self.config) {
                Some(token) => Some(token),
                None => {
                    tracing::debug!(
                        target: "hoard::client",
                        url = %uri,
                        "private scope without caller token; forwarding uncached"
                    );
                    return self.forward_only(&request);
                }
            }
        } else {
            None
        };

        let projection = vary_projection(&request, &settings.vary);
        let response_key = self.keys.response_key(&uri, &projection, token.as_deref());

        if settings.cache_control.must_revalidate {
            let mut conditional = self.strip_private(request.clone());
            if let Some(ref etag) = settings.etag {
                conditional = conditional.header(header::IF_NONE_MATCH, etag.as_str());
            }
            if let Some(last_modified) = settings.last_modified {
                conditional =
                    conditional.header(header::IF_MODIFIED_SINCE, format_http_date(last_modified));
            }

            let revalidated = self.client.send(conditional)?;
            if revalidated.status() != StatusCode::NOT_MODIFIED {
                tracing::debug!(
                    target: "hoard::client",
                    url = %uri,
                    status = revalidated.status().as_u16(),
                    "revalidation returned a fresh response"
                );
                return self.store_and_return(&request, revalidated, now);
            }
            tracing::debug!(target: "hoard::client", url = %uri, "origin confirmed cached representation");
        }

        // A 304 with an evicted response blob falls through here and
        // silently re-fetches without conditional headers.
        let Some(blob) = self.backend_get(&response_key) else {
            return self.forward_and_store(&request, now);
        };
        let Some(mut response) = envelope::deserialize(&blob) else {
            tracing::debug!(
                target: "hoard::cache",
                key = %response_key,
                "malformed cached response; treating as miss"
            );
            return self.forward_and_store(&request, now);
        };

        if let Some(date) = settings.date {
            let age = now - date;
            if age > 0 {
                if let Ok(value) = HeaderValue::from_str(&age.to_string()) {
                    response.set_header(header::AGE, value);
                }
            }
        }

        tracing::debug!(target: "hoard::client", url = %uri, key = %response_key, "cache hit");
        Ok(response)
    }

    /// Forward with the private-scope header stripped; no storage attempt.
    fn forward_only(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.client.send(self.strip_private(request.clone()))
    }

    /// Forward, then attempt admission of whatever came back.
    fn forward_and_store(&self, request: &HttpRequest, now: i64) -> Result<HttpResponse> {
        let response = self.forward_only(request)?;
        self.store_and_return(request, response, now)
    }

    /// Drain the response body into a replayable buffer, run the
    /// storability filter, and write both blobs on admission. The drained
    /// body goes back to the caller either way.
    fn store_and_return(
        &self,
        request: &HttpRequest,
        mut response: HttpResponse,
        now: i64,
    ) -> Result<HttpResponse> {
        let drained = response
            .take_body()
            .into_bytes()
            .map_err(|e| Error::body(e).with_url(request.url().clone()))?;
        let response = response.with_body(Body::from_bytes(drained.clone()));

        let blob = envelope::serialize(&response, &drained);
        if let Some(plan) = admission::plan_store(request, &response, blob.len(), now, &self.config)
        {
            self.write_entry(request, &plan, &blob);
        }

        Ok(response)
    }

    /// Write the settings and response blobs with identical TTL.
    fn write_entry(&self, request: &HttpRequest, plan: &StorePlan, blob: &[u8]) {
        let uri = request.url().to_string();
        let settings_json = match plan.settings.to_json() {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(
                    target: "hoard::cache",
                    %error,
                    "failed to encode cache settings; skipping store"
                );
                return;
            }
        };

        let projection = vary_projection(request, &plan.settings.vary);
        let settings_key = self.keys.settings_key(&uri);
        let response_key =
            self.keys.response_key(&uri, &projection, plan.private_token.as_deref());

        self.backend_set(&settings_key, &settings_json, plan.ttl);
        self.backend_set(&response_key, blob, plan.ttl);
        tracing::debug!(
            target: "hoard::cache",
            url = %uri,
            key = %response_key,
            ttl = plan.ttl,
            "stored response"
        );
    }

    fn strip_private(&self, request: HttpRequest) -> HttpRequest {
        request.without_header(&self.config.private_key_header)
    }

    /// Backend read with faults degraded to a miss.
    fn backend_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(
                    target: "hoard::cache",
                    key,
                    %error,
                    "backend read failed; treating as miss"
                );
                None
            }
        }
    }

    /// Backend write with faults degraded to non-admission.
    fn backend_set(&self, key: &str, value: &[u8], ttl: i64) {
        if let Err(error) = self.backend.set(key, value, ttl) {
            tracing::debug!(
                target: "hoard::cache",
                key,
                %error,
                "backend write failed; entry not stored"
            );
        }
    }
}

impl<C: HttpClient> HttpClient for CachingClient<C> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        CachingClient::send(self, request)
    }
}

/// Why a request skips the cacheable path entirely, if it does.
fn bypass_reason(request: &HttpRequest) -> Option<&'static str> {
    if matches!(request.version(), Version::HTTP_09 | Version::HTTP_10) {
        return Some("http/1.0 request");
    }
    if request.method() != Method::GET {
        return Some("non-GET method");
    }
    if request.has_header("range") || request.has_header("content-range") {
        return Some("partial request");
    }
    const PRECONDITIONS: [&str; 5] = [
        "if-none-match",
        "if-match",
        "if-range",
        "if-modified-since",
        "if-unmodified-since",
    ];
    if PRECONDITIONS.iter().any(|name| request.has_header(name)) {
        return Some("caller preconditions");
    }
    None
}
