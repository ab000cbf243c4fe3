//! Cache backend interface
//!
//! The backend is a flat byte-string store with per-entry TTL, the only
//! shared mutable state in the system. It must be safe under concurrent
//! get/set/clear; the decorator adds no locking of its own and treats
//! every backend fault as a miss or a non-admission.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Errors a backend may raise. The decorator logs and swallows them.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Flat key → byte-string store with advisory TTL expiry.
pub trait CacheBackend: Send + Sync {
    /// Fetch a value; `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Store a value for at most `ttl_seconds`.
    fn set(&self, key: &str, value: &[u8], ttl_seconds: i64) -> Result<(), BackendError>;

    /// Drop every entry.
    fn clear(&self) -> Result<(), BackendError>;
}

/// Thread-safe in-process backend honoring TTL on read.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|e| e.expires_at.map_or(true, |at| at > now))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let mut entries = self.entries.lock().map_err(|_| "backend lock poisoned")?;

        match entries.get(key) {
            Some(entry) => {
                if entry.expires_at.is_some_and(|at| at <= Instant::now()) {
                    entries.remove(key);
                    return Ok(None);
                }
                Ok(Some(entry.value.clone()))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl_seconds: i64) -> Result<(), BackendError> {
        let expires_at = if ttl_seconds <= 0 {
            Some(Instant::now())
        } else {
            Instant::now().checked_add(Duration::from_secs(ttl_seconds as u64))
        };

        let mut entries = self.entries.lock().map_err(|_| "backend lock poisoned")?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        let mut entries = self.entries.lock().map_err(|_| "backend lock poisoned")?;
        entries.clear();
        Ok(())
    }
}
