//! Key-value cache trait and error types.

use async_trait::async_trait;

/// Errors that can occur while setting up a cache backend.
///
/// Operational errors never reach callers; the trait below fails open.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for a TTL-based key-value cache backend.
///
/// Implementations must be thread-safe and fail open: a backend error is
/// logged and surfaces as a miss (`get`/`exists`) or a no-op
/// (`set`/`delete`), never as an error the request path has to handle.
/// Callers always fall back to the store on a miss.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::NullCache`] - no-op for disabled caching
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process map used in tests
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Retrieves the raw value stored under `key`.
    ///
    /// Returns `None` on a miss, an expired entry, or a backend error.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` with a TTL, overwriting any prior value.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64);

    /// Removes `key`. Deleting a non-existent key is a no-op.
    async fn delete(&self, key: &str);

    /// Reports whether an unexpired value exists under `key`.
    async fn exists(&self, key: &str) -> bool;

    /// Checks if the cache backend is reachable.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
