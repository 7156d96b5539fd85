//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, KeyValueCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache backend.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse. All operations are fail-open: errors are logged but never
/// propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    /// Callers treat that as "no cache" and fall back to
    /// [`super::NullCache`], never as a fatal startup error.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        redis::cmd("PING")
            .query_async::<()>(&mut test_conn)
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache HIT");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache MISS");
                None
            }
            Err(e) => {
                error!(key, error = %e, "Redis GET error");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) {
        let mut conn = self.client.clone();

        match conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await {
            Ok(()) => debug!(key, ttl_seconds, "Cache SET"),
            Err(e) => warn!(key, error = %e, "Redis SET error"),
        }
    }

    async fn delete(&self, key: &str) {
        let mut conn = self.client.clone();

        match conn.del::<_, i64>(key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!(key, "Cache INVALIDATE");
                }
            }
            Err(e) => warn!(key, error = %e, "Redis DEL error"),
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.client.clone();

        match conn.exists::<_, bool>(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key, error = %e, "Redis EXISTS error");
                false
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        redis::cmd("PING").query_async::<()>(&mut conn).await.is_ok()
    }
}
