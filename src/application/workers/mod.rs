//! Long-running background workers.
//!
//! - [`CacheRefreshWorker`] - Warm-up, periodic refresh, change-driven refresh
//! - [`BillingReminderWorker`] - Scheduled reminder emails

pub mod refresh;
pub mod reminder;

pub use refresh::CacheRefreshWorker;
pub use reminder::BillingReminderWorker;
