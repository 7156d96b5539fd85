//! Subscription entity representing a recurring payment record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A recurring payment tracked for a single user.
///
/// Owned by the store; the cache only ever holds serialized copies. Every
/// mutation goes through the store and invalidates the owner's cache keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub billing_cycle: String,
    pub next_billing_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating or replacing a subscription record.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub billing_cycle: String,
    pub next_billing_date: NaiveDate,
}

/// Aggregated per-user view of active subscriptions.
///
/// `next_payment` is the price of the active subscription with the soonest
/// `next_billing_date`, `None` when the user has no active subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubscriptionStats {
    pub total_monthly: Option<f64>,
    pub active_count: i64,
    pub next_payment: Option<f64>,
}
