//! # hoard
//!
//! Transparent RFC 7234 HTTP response caching decorator for synchronous
//! clients. Wrap any [`HttpClient`] in a [`CachingClient`] and GET
//! responses are served from a shared key-value cache whenever the stored
//! representation is fresh, revalidated conditionally when the origin
//! demands it, and forwarded otherwise.
//!
//! ## Features
//!
//! - **Quote-aware directive parsing** for `Cache-Control`, `Expires`,
//!   `Date`, `Last-Modified`, `ETag`, and `Vary`
//! - **Deterministic cache keys** from request identity, Vary-selected
//!   headers, and an optional private-scope token
//! - **Conditional revalidation** with `If-None-Match` and
//!   `If-Modified-Since` for `must-revalidate` representations
//! - **Pluggable backend and key factory**; a thread-safe in-memory
//!   backend ships in the box
//! - **Best-effort degradation**: every cache fault falls back to
//!   forwarding, and callers only ever see transport errors
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hoard::{CachingClient, HttpClient, HttpRequest, MemoryBackend};
//! use url::Url;
//!
//! fn fetch(origin: impl HttpClient) -> hoard::Result<()> {
//!     let client = CachingClient::new(origin, Arc::new(MemoryBackend::new()));
//!
//!     let url = Url::parse("http://example.com/page").expect("url");
//!     let first = client.send(HttpRequest::get(url.clone()))?;
//!     let second = client.send(HttpRequest::get(url))?; // served from cache when fresh
//!     drop((first, second));
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{
    vary_projection, BackendError, CacheBackend, CacheControl, CacheKeyFactory, CacheSettings,
    DefaultKeyFactory, MemoryBackend,
};
pub use client::{CachingClient, HttpClient};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use http::{Body, HttpRequest, HttpResponse};
