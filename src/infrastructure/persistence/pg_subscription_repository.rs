//! PostgreSQL implementation of the subscription repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSubscription, Subscription, SubscriptionStats};
use crate::domain::repositories::SubscriptionRepository;
use crate::error::AppError;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, name, category, price, billing_cycle, \
     next_billing_date, is_active, created_at, updated_at";

/// PostgreSQL repository for subscription records.
pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>, AppError> {
        let rows = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, AppError> {
        let row = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn create(
        &self,
        new: NewSubscription,
        user_id: i64,
    ) -> Result<Subscription, AppError> {
        let row = sqlx::query_as::<_, Subscription>(&format!(
            "INSERT INTO subscriptions \
                 (user_id, name, category, price, billing_cycle, next_billing_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price)
        .bind(&new.billing_cycle)
        .bind(new.next_billing_date)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, new: NewSubscription) -> Result<Subscription, AppError> {
        let row = sqlx::query_as::<_, Subscription>(&format!(
            "UPDATE subscriptions SET \
                 name = $1, category = $2, price = $3, billing_cycle = $4, \
                 next_billing_date = $5, updated_at = NOW() \
             WHERE id = $6 \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price)
        .bind(&new.billing_cycle)
        .bind(new.next_billing_date)
        .bind(id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upcoming(&self, window_days: i64) -> Result<Vec<Subscription>, AppError> {
        let cutoff = upcoming_cutoff(Utc::now().date_naive(), window_days);
        let rows = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE is_active AND next_billing_date <= $1 \
             ORDER BY next_billing_date"
        ))
        .bind(cutoff)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<SubscriptionStats, AppError> {
        let stats = sqlx::query_as::<_, SubscriptionStats>(
            "SELECT \
                 SUM(price) FILTER (WHERE is_active) AS total_monthly, \
                 COUNT(*) FILTER (WHERE is_active) AS active_count, \
                 (SELECT price FROM subscriptions \
                  WHERE user_id = $1 AND is_active \
                  ORDER BY next_billing_date LIMIT 1) AS next_payment \
             FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(stats)
    }

    async fn active_user_ids(&self) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT user_id FROM subscriptions WHERE is_active ORDER BY user_id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn latest_change(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let watermark = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(GREATEST(created_at, updated_at)) FROM subscriptions",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(watermark)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

/// Latest billing date still inside the reminder window.
///
/// Computed application-side and bound as a `DATE` parameter so the query
/// never relies on date arithmetic against the bound integer's wire type.
fn upcoming_cutoff(today: NaiveDate, window_days: i64) -> NaiveDate {
    today + Duration::days(window_days)
}
