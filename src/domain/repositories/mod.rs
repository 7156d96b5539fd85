//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data access; concrete implementations
//! live in `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for testing.

pub mod subscription_repository;
pub mod user_repository;

pub use subscription_repository::SubscriptionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
