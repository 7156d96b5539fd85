//! Application services orchestrating domain and infrastructure.
//!
//! # Services
//!
//! - [`AuthService`] - Registration, credential checks, JWT issuance
//! - [`SubscriptionService`] - Subscription CRUD with read-through caching
//! - [`SubscriptionCache`] - Typed per-user cache operations

pub mod auth_service;
pub mod cache_service;
pub mod subscription_service;

pub use auth_service::{AuthService, JwtConfig, TokenPair};
pub use cache_service::{CacheKeys, SubscriptionCache};
pub use subscription_service::{ReadSource, SubscriptionService};
