//! Per-URI cache settings record
//!
//! The settings blob is the JSON-encoded metadata of the last admitted
//! response for a URI: its cache directives, validation fields, and Vary
//! list. The on-disk form keeps `0` / `""` as "absent" so entries written
//! by earlier deployments keep decoding; in memory everything is a tagged
//! optional.

use serde::{Deserialize, Serialize};

use super::directives::{parse_vary, CacheControl};
use crate::http::date::parse_http_date;
use crate::http::HttpResponse;

/// Directive subset retained in the settings blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsCacheControl {
    #[serde(rename = "no-store")]
    pub no_store: bool,
    #[serde(rename = "no-cache")]
    pub no_cache: bool,
    #[serde(rename = "must-revalidate")]
    pub must_revalidate: bool,
    pub public: bool,
    pub private: bool,
    #[serde(rename = "max-age", with = "sentinel_int")]
    pub max_age: Option<i64>,
    #[serde(rename = "s-maxage", with = "sentinel_int")]
    pub s_maxage: Option<i64>,
}

/// Per-URI metadata derived from the last cached response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheSettings {
    pub cache_control: SettingsCacheControl,
    #[serde(with = "sentinel_int")]
    pub date: Option<i64>,
    #[serde(with = "sentinel_int")]
    pub expires: Option<i64>,
    #[serde(with = "sentinel_int")]
    pub last_modified: Option<i64>,
    #[serde(with = "sentinel_string")]
    pub etag: Option<String>,
    pub vary: Vec<String>,
}

impl CacheSettings {
    /// Derive the settings record from a response's header fields.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let cc = CacheControl::parse(response.header_values("cache-control"));

        Self {
            cache_control: SettingsCacheControl {
                no_store: cc.no_store,
                no_cache: cc.no_cache,
                must_revalidate: cc.must_revalidate,
                public: cc.public,
                private: cc.private,
                max_age: cc.max_age,
                s_maxage: cc.s_maxage,
            },
            date: response.header_value("date").and_then(parse_http_date),
            expires: response.header_value("expires").and_then(parse_http_date),
            last_modified: response
                .header_value("last-modified")
                .and_then(parse_http_date),
            etag: response.header_value("etag").map(str::to_string),
            vary: parse_vary(response.header_values("vary")),
        }
    }

    /// Decode a settings blob. Malformed JSON is a settings miss.
    #[must_use]
    pub fn from_json(blob: &[u8]) -> Option<Self> {
        serde_json::from_slice(blob).ok()
    }

    /// Encode for storage.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// `0`, `null`, and a missing field all mean "absent"; encode writes `0`.
mod sentinel_int {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<i64>::deserialize(d)?;
        Ok(value.filter(|&v| v != 0))
    }
}

/// `""`, `null`, and a missing field all mean "absent"; encode writes `""`.
mod sentinel_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(d)?;
        Ok(value.filter(|v| !v.is_empty()))
    }
}
