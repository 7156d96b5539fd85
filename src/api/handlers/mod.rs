//! HTTP request handlers.

pub mod auth;
pub mod cache;
pub mod health;
pub mod subscriptions;

pub use auth::{login_handler, me_handler, refresh_handler, register_handler};
pub use cache::clear_cache_handler;
pub use health::health_handler;
pub use subscriptions::{
    create_subscription_handler, delete_subscription_handler, get_subscription_handler,
    list_subscriptions_handler, stats_handler, update_subscription_handler,
};
