//! In-process cache backend with TTL expiry.

use super::service::KeyValueCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// A map-backed cache with per-entry TTL.
///
/// Expiry is checked lazily on read: an entry past its deadline is treated
/// exactly like an absent one. Timing uses `tokio::time::Instant`, so tests
/// running with a paused runtime clock can advance time without sleeping.
///
/// This backend exists for tests and single-process development setups;
/// production deployments use [`super::RedisCache`].
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired entries currently held.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        };
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(key);
    }

    async fn exists(&self, key: &str) -> bool {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .get(key)
            .is_some_and(|e| e.expires_at > Instant::now())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
