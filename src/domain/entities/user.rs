//! User account entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account that owns subscription records.
///
/// The password hash never leaves the server: it is skipped during
/// serialization so handlers can return the entity directly.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Identity resolved by the authentication middleware.
///
/// Attached to the request as a typed extension so protected handlers
/// receive the caller explicitly instead of digging through an untyped
/// context.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
