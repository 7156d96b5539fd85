//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user account storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email is already taken.
    async fn create(&self, new: NewUser) -> Result<User, AppError>;

    /// Looks a user up by id, `Ok(None)` when absent.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Looks a user up by email, `Ok(None)` when absent.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}
