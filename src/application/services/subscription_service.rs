//! Subscription business logic: read-through caching and
//! invalidate-on-write coordination.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::cache_service::SubscriptionCache;
use crate::domain::entities::{NewSubscription, Subscription, SubscriptionStats};
use crate::domain::repositories::SubscriptionRepository;
use crate::error::AppError;

/// Where a read was served from. Handlers surface this as the `X-Cache`
/// response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    Cache,
    Store,
}

impl ReadSource {
    pub fn as_header_value(self) -> &'static str {
        match self {
            ReadSource::Cache => "HIT",
            ReadSource::Store => "MISS",
        }
    }
}

/// Orchestrates subscription reads and writes across the store and cache.
///
/// Reads consult the cache before the store and repopulate it on a miss
/// without making the requester wait. Every write invalidates both of the
/// owner's cache keys before returning; between mutations, staleness is
/// bounded by the TTL and the refresh worker.
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepository>,
    cache: Arc<SubscriptionCache>,
}

impl SubscriptionService {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        cache: Arc<SubscriptionCache>,
    ) -> Self {
        Self { repository, cache }
    }

    /// Returns a user's subscriptions, preferring the cache.
    ///
    /// On a miss the store result is returned immediately and a detached
    /// task repopulates the cache; failures of that task are only
    /// observable in logs.
    pub async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<(Vec<Subscription>, ReadSource), AppError> {
        if self.cache.has_user_subscriptions_cache(user_id).await
            && let Some(list) = self.cache.get_cached_user_subscriptions(user_id).await
        {
            return Ok((list, ReadSource::Cache));
        }

        let list = self.repository.list_for_user(user_id).await?;

        let cache = Arc::clone(&self.cache);
        let snapshot = list.clone();
        tokio::spawn(async move {
            cache.cache_user_subscriptions(user_id, &snapshot).await;
        });

        Ok((list, ReadSource::Store))
    }

    /// Returns a user's stats aggregate, preferring the cache.
    pub async fn stats_for_user(
        &self,
        user_id: i64,
    ) -> Result<(SubscriptionStats, ReadSource), AppError> {
        if self.cache.has_user_stats_cache(user_id).await
            && let Some(stats) = self.cache.get_cached_user_stats(user_id).await
        {
            return Ok((stats, ReadSource::Cache));
        }

        let stats = self.repository.stats_for_user(user_id).await?;

        let cache = Arc::clone(&self.cache);
        let snapshot = stats.clone();
        tokio::spawn(async move {
            cache.cache_user_stats(user_id, &snapshot).await;
        });

        Ok((stats, ReadSource::Store))
    }

    /// Fetches one subscription, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the record does not exist or
    /// belongs to another user.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Subscription, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(sub) if sub.user_id == user_id => Ok(sub),
            _ => Err(Self::not_found(id)),
        }
    }

    /// Creates a subscription and invalidates the owner's cache keys
    /// before returning.
    pub async fn create(
        &self,
        user_id: i64,
        new: NewSubscription,
    ) -> Result<Subscription, AppError> {
        let created = self.repository.create(new, user_id).await?;
        self.cache.invalidate_user(user_id).await;
        Ok(created)
    }

    /// Updates a subscription owned by `user_id` and invalidates the
    /// owner's cache keys before returning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the record does not exist or
    /// belongs to another user; the record is left untouched in that case.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        new: NewSubscription,
    ) -> Result<Subscription, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(existing) if existing.user_id == user_id => {}
            _ => return Err(Self::not_found(id)),
        }

        let updated = self.repository.update(id, new).await?;
        self.cache.invalidate_user(user_id).await;
        Ok(updated)
    }

    /// Deletes a subscription owned by `user_id` and invalidates the
    /// owner's cache keys before returning.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        let deleted = self.repository.delete(id, user_id).await?;
        if !deleted {
            return Err(Self::not_found(id));
        }

        self.cache.invalidate_user(user_id).await;
        Ok(())
    }

    /// Active subscriptions due within the window. Used by the reminder
    /// worker; reads the store directly, never the cache.
    pub async fn upcoming(&self, window_days: i64) -> Result<Vec<Subscription>, AppError> {
        self.repository.upcoming(window_days).await
    }

    /// Store connectivity probe for the health endpoint.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Subscription not found", json!({ "id": id }))
    }
}
