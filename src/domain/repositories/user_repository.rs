//! Repository trait for user data access.

use crate::domain::entities::{NewUser, UpdateUser, User};
use crate::error::RepositoryError;
use async_trait::async_trait;

/// Repository interface for the authoritative user store.
///
/// Every call is independent; no transaction spans two calls. Point lookups and
/// mutations that match nothing return [`RepositoryError::NotFound`]. List and search
/// operations always return a (possibly empty) ordered `Vec`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no user has this id.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError>;

    /// Finds a user by email (exact match).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no user has this email.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;

    /// Inserts a new user. Storage assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ConstraintViolation`] if the email already exists.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// Replaces `email` and `name` of an existing user. `created_at` is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if zero rows were affected.
    /// Returns [`RepositoryError::ConstraintViolation`] if the new email is taken.
    async fn update(&self, id: i64, changes: UpdateUser) -> Result<(), RepositoryError>;

    /// Removes a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if zero rows were affected.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Lists all users ordered by id ascending.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Finds users whose name contains `pattern`, case-insensitively,
    /// ordered by id ascending.
    ///
    /// Wildcard characters in `pattern` are matched literally.
    async fn find_by_name_pattern(&self, pattern: &str) -> Result<Vec<User>, RepositoryError>;

    /// Counts all users.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Lists users created within the last `days` days, newest first.
    ///
    /// `days = 0` is valid and selects only records created at the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidInput`] if `days` does not fit the storage
    /// interval type.
    async fn get_recent(&self, days: u32) -> Result<Vec<User>, RepositoryError>;
}
