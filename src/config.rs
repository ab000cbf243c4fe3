//! Decorator configuration
//!
//! Construction-time, immutable settings governing private-scope keying,
//! entry size admission, and the TTL ceiling.

/// Request header through which a caller supplies its private-scope token.
pub const DEFAULT_PRIVATE_KEY_HEADER: &str = "X-Private-Cache-Key";

/// Ceiling applied to every stored TTL, in seconds.
pub const DEFAULT_MAX_TTL: i64 = 1 << 31;

/// Caching decorator configuration and limits.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Header the caller uses to supply the private-scope token. The header
    /// is stripped from every request forwarded to the origin.
    pub private_key_header: String,
    /// Ceiling on the serialized size of a cache entry; `None` = unlimited.
    pub max_cache_item_size: Option<usize>,
    /// Ceiling on per-entry TTL in seconds.
    pub max_ttl: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            private_key_header: DEFAULT_PRIVATE_KEY_HEADER.to_string(),
            max_cache_item_size: None,
            max_ttl: DEFAULT_MAX_TTL,
        }
    }
}
