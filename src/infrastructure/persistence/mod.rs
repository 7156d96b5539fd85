//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgSubscriptionRepository`] - Subscription storage, aggregates, and the change watermark
//! - [`PgUserRepository`] - User account storage

pub mod pg_subscription_repository;
pub mod pg_user_repository;

pub use pg_subscription_repository::PgSubscriptionRepository;
pub use pg_user_repository::PgUserRepository;
