//! Read-side cache façade for per-user subscription data.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{Subscription, SubscriptionStats};
use crate::infrastructure::cache::KeyValueCache;

/// Key derivation patterns for the two cached data kinds.
///
/// Each pattern must contain the `{id}` placeholder; the `(kind, scope)`
/// structure is fixed, only the textual format is configurable.
#[derive(Debug, Clone)]
pub struct CacheKeys {
    pub user_subscriptions: String,
    pub user_stats: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            user_subscriptions: "subscriptions:user:{id}".to_string(),
            user_stats: "stats:user:{id}".to_string(),
        }
    }
}

impl CacheKeys {
    pub fn subscriptions_key(&self, user_id: i64) -> String {
        self.user_subscriptions.replace("{id}", &user_id.to_string())
    }

    pub fn stats_key(&self, user_id: i64) -> String {
        self.user_stats.replace("{id}", &user_id.to_string())
    }
}

/// Translates domain reads and writes into namespaced key-value operations.
///
/// Caching is best-effort throughout: a backend failure is logged and
/// swallowed, a corrupt payload counts as a miss, and with [`NullCache`]
/// behind it every probe misses, which is the first-class cache-disabled
/// mode.
///
/// [`NullCache`]: crate::infrastructure::cache::NullCache
pub struct SubscriptionCache {
    backend: Arc<dyn KeyValueCache>,
    ttl_seconds: u64,
    keys: CacheKeys,
}

impl SubscriptionCache {
    pub fn new(backend: Arc<dyn KeyValueCache>, ttl_seconds: u64, keys: CacheKeys) -> Self {
        Self {
            backend,
            ttl_seconds,
            keys,
        }
    }

    /// Stores a user's subscription list under its namespaced key.
    pub async fn cache_user_subscriptions(&self, user_id: i64, subscriptions: &[Subscription]) {
        self.store(&self.keys.subscriptions_key(user_id), &subscriptions)
            .await;
    }

    /// Returns the cached subscription list, `None` on miss or expiry.
    ///
    /// An empty cached list is a hit and is distinct from a miss.
    pub async fn get_cached_user_subscriptions(&self, user_id: i64) -> Option<Vec<Subscription>> {
        self.load(&self.keys.subscriptions_key(user_id)).await
    }

    /// Stores a user's stats aggregate under its namespaced key.
    pub async fn cache_user_stats(&self, user_id: i64, stats: &SubscriptionStats) {
        self.store(&self.keys.stats_key(user_id), stats).await;
    }

    /// Returns the cached stats aggregate, `None` on miss or expiry.
    pub async fn get_cached_user_stats(&self, user_id: i64) -> Option<SubscriptionStats> {
        self.load(&self.keys.stats_key(user_id)).await
    }

    /// Deletes the user's subscription-list key.
    pub async fn invalidate_user_subscriptions(&self, user_id: i64) {
        self.backend
            .delete(&self.keys.subscriptions_key(user_id))
            .await;
    }

    /// Deletes the user's stats key.
    pub async fn invalidate_user_stats(&self, user_id: i64) {
        self.backend.delete(&self.keys.stats_key(user_id)).await;
    }

    /// Deletes both of the user's keys. Every store write path calls this
    /// in the same logical operation as the mutation.
    pub async fn invalidate_user(&self, user_id: i64) {
        self.invalidate_user_subscriptions(user_id).await;
        self.invalidate_user_stats(user_id).await;
    }

    /// Existence probe for the subscription-list key.
    pub async fn has_user_subscriptions_cache(&self, user_id: i64) -> bool {
        self.backend
            .exists(&self.keys.subscriptions_key(user_id))
            .await
    }

    /// Existence probe for the stats key.
    pub async fn has_user_stats_cache(&self, user_id: i64) -> bool {
        self.backend.exists(&self.keys.stats_key(user_id)).await
    }

    /// Reports backend reachability for the health endpoint.
    pub async fn backend_healthy(&self) -> bool {
        self.backend.health_check().await
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => {
                self.backend.set(key, &payload, self.ttl_seconds).await;
                debug!(key, "Cached value");
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize value for cache"),
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.backend.get(key).await?;

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                // A corrupt or incompatible payload is a miss, not an error.
                warn!(key, error = %e, "Discarding undecodable cached payload");
                self.backend.delete(key).await;
                None
            }
        }
    }
}
