//! User entity, the only record type managed by this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user.
///
/// `id` and `created_at` are assigned by storage on insert and never change.
/// `email` uniqueness is enforced by storage alone.
///
/// The serde representation is field-named JSON with an RFC 3339 `created_at`;
/// it is also the cache value format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance.
    pub fn new(id: i64, email: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            name,
            created_at,
        }
    }
}

/// Input data for creating a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Replacement values for an existing user's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub email: String,
    pub name: String,
}

impl UpdateUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}
