//! Storability filter
//!
//! Gates admission of an origin response by status code, directives,
//! Vary, private-scope consistency, computed TTL, and serialized size.
//! A refusal is never an error: the response still goes back to the
//! caller, it just isn't written.

use http::StatusCode;

use super::directives::{parse_vary, CacheControl};
use super::settings::CacheSettings;
use crate::config::CacheConfig;
use crate::http::date::parse_http_date;
use crate::http::{HttpRequest, HttpResponse};

/// Everything the decorator needs to write an admitted response: the
/// settings record (whose Vary list feeds the response key), the private
/// token, and the TTL applied to both blobs.
#[derive(Debug, Clone)]
pub(crate) struct StorePlan {
    pub settings: CacheSettings,
    pub private_token: Option<String>,
    pub ttl: i64,
}

/// Evaluate the admission rules for an origin response paired with its
/// originating request. `None` means the response is not storable.
pub(crate) fn plan_store(
    request: &HttpRequest,
    response: &HttpResponse,
    serialized_len: usize,
    now: i64,
    config: &CacheConfig,
) -> Option<StorePlan> {
    let status = response.status();
    if status != StatusCode::OK && status != StatusCode::MOVED_PERMANENTLY {
        tracing::debug!(
            target: "hoard::cache",
            status = status.as_u16(),
            "not storable: status outside admission set"
        );
        return None;
    }

    let request_cc = CacheControl::parse(request.header_values("cache-control"));
    let response_cc = CacheControl::parse(response.header_values("cache-control"));
    if request_cc.no_store || response_cc.no_store {
        tracing::debug!(target: "hoard::cache", "not storable: no-store");
        return None;
    }

    let vary = parse_vary(response.header_values("vary"));
    if vary.iter().any(|name| name == "*") {
        tracing::debug!(target: "hoard::cache", "not storable: Vary: *");
        return None;
    }

    let date = response.header_value("date").and_then(parse_http_date);
    let expires = response.header_value("expires").and_then(parse_http_date);
    let ttl = derive_ttl(response_cc.max_age, expires, date, now, config.max_ttl);
    if ttl <= 0 {
        tracing::debug!(target: "hoard::cache", "not storable: zero ttl");
        return None;
    }

    let private_scoped = response_cc.private || request.has_header("authorization");
    let private_token = if private_scoped {
        match private_header_token(request, config) {
            Some(token) => Some(token),
            None => {
                tracing::debug!(
                    target: "hoard::cache",
                    "not storable: private scope without caller token"
                );
                return None;
            }
        }
    } else {
        None
    };

    if let Some(max) = config.max_cache_item_size {
        if serialized_len > max {
            tracing::debug!(
                target: "hoard::cache",
                serialized_len,
                limit = max,
                "not storable: serialized size over limit"
            );
            return None;
        }
    }

    Some(StorePlan {
        settings: CacheSettings::from_response(response),
        private_token,
        ttl,
    })
}

/// TTL of a storable response in seconds.
///
/// `max_age` falls back to the TTL ceiling when the response carries no
/// `max-age`; `Expires` and `Date` fall back to `now`-relative values.
/// The effective expiry is the earlier of `date + max_age` and `Expires`.
pub(crate) fn derive_ttl(
    max_age: Option<i64>,
    expires: Option<i64>,
    date: Option<i64>,
    now: i64,
    max_ttl: i64,
) -> i64 {
    let max_age = max_age.unwrap_or(max_ttl);
    let header_expires = expires.unwrap_or(now + max_age);
    let date = date.unwrap_or(now);

    let effective_expires = (date + max_age).min(header_expires);
    (effective_expires - now).clamp(0, max_ttl)
}

/// The caller-supplied private-scope token, if the configured header is
/// present on the request.
pub(crate) fn private_header_token(request: &HttpRequest, config: &CacheConfig) -> Option<String> {
    request
        .has_header(&config.private_key_header)
        .then(|| request.header_line(&config.private_key_header))
}
