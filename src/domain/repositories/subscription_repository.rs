//! Repository trait for subscription records and their aggregates.

use crate::domain::entities::{NewSubscription, Subscription, SubscriptionStats};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the subscription store.
///
/// The store is the single source of truth; the cache layer only holds
/// disposable copies of what these methods return.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSubscriptionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Returns all subscriptions owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>, AppError>;

    /// Fetches a single subscription by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(subscription))` if the record exists
    /// - `Ok(None)` otherwise
    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, AppError>;

    /// Inserts a new subscription for a user and returns the stored record.
    async fn create(
        &self,
        new: NewSubscription,
        user_id: i64,
    ) -> Result<Subscription, AppError>;

    /// Replaces the mutable fields of a subscription and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist.
    async fn update(&self, id: i64, new: NewSubscription) -> Result<Subscription, AppError>;

    /// Deletes a subscription owned by `user_id`.
    ///
    /// # Returns
    ///
    /// `true` when a row was removed, `false` when no matching record
    /// exists for that owner.
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Returns active subscriptions due within the next `window_days` days.
    ///
    /// An empty result is a normal outcome, not an error.
    async fn upcoming(&self, window_days: i64) -> Result<Vec<Subscription>, AppError>;

    /// Computes the per-user aggregate over active subscriptions.
    async fn stats_for_user(&self, user_id: i64) -> Result<SubscriptionStats, AppError>;

    /// Returns the distinct owners of at least one active subscription.
    ///
    /// Used by the cache refresh worker to know which per-user keys to warm.
    async fn active_user_ids(&self) -> Result<Vec<i64>, AppError>;

    /// Returns the most recent create/update timestamp across all
    /// subscriptions, `None` for an empty table.
    ///
    /// Serves as the change watermark polled by the refresh worker.
    async fn latest_change(&self) -> Result<Option<DateTime<Utc>>, AppError>;

    /// Verifies store connectivity. Used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
