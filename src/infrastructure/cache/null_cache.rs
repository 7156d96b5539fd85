//! No-op cache implementation for disabled caching.

use super::service::KeyValueCache;
use async_trait::async_trait;
use tracing::debug;

/// A cache backend that does nothing.
///
/// This is the first-class "no cache" mode: every read misses, every write
/// and delete succeeds immediately, so call sites degrade to store-only
/// operation without any special casing.
///
/// Used when Redis is not configured or the connection fails at startup.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCache for NullCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) {}

    async fn delete(&self, _key: &str) {}

    async fn exists(&self, _key: &str) -> bool {
        false
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();

        cache.set("k", "v", 60).await;

        assert!(cache.get("k").await.is_none());
        assert!(!cache.exists("k").await);
    }

    #[tokio::test]
    async fn test_null_cache_reports_healthy() {
        assert!(NullCache::new().health_check().await);
    }
}
