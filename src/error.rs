//! Error taxonomy shared by the storage and cached repositories.
//!
//! Point lookups and mutations that find nothing report [`RepositoryError::NotFound`];
//! list and search operations never do, they return an empty `Vec` instead.

use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A lookup found nothing, or a mutation affected zero rows.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A uniqueness or other integrity rule was rejected by storage.
    #[error("{message}")]
    ConstraintViolation { message: String, details: Value },

    /// Storage communication or execution failure.
    #[error("{message}")]
    Storage { message: String, details: Value },

    /// Cache backend failure. Only surfaced where correctness depends on the cache
    /// operation reaching the backend (invalidation).
    #[error("{message}")]
    Cache { message: String, details: Value },

    /// Caller-supplied argument rejected before reaching storage.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn constraint_violation(message: impl Into<String>, details: Value) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn cache(message: impl Into<String>, details: Value) -> Self {
        Self::Cache {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    /// Returns true for the "found nothing" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Structured context attached to the error.
    pub fn details(&self) -> &Value {
        match self {
            Self::NotFound { details, .. }
            | Self::ConstraintViolation { details, .. }
            | Self::Storage { details, .. }
            | Self::Cache { details, .. }
            | Self::InvalidInput { details, .. } => details,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Translates a sqlx error into the repository taxonomy.
///
/// `RowNotFound` is not expected here: point lookups use `fetch_optional` and decide
/// on `NotFound` themselves. Should one slip through it still maps to `NotFound`.
pub fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::RowNotFound = e {
        return RepositoryError::not_found("Record not found", json!({}));
    }

    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return RepositoryError::constraint_violation(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!("Database error: {}", e);
    RepositoryError::storage("Database error", json!({ "reason": e.to_string() }))
}
