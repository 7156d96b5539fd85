//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. Creation
//! payloads follow the "New Type" pattern (`NewUser`, `NewSubscription`)
//! so repositories never receive client-controlled ids or timestamps.

pub mod subscription;
pub mod user;

pub use subscription::{NewSubscription, Subscription, SubscriptionStats};
pub use user::{AuthenticatedUser, NewUser, User};
