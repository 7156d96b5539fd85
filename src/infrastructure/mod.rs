//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer against concrete
//! backends.
//!
//! # Modules
//!
//! - [`cache`] - Key-value caching backends (Redis, no-op, in-memory)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`email`] - SMTP delivery for billing reminders

pub mod cache;
pub mod email;
pub mod persistence;
