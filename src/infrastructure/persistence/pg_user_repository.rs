//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, UpdateUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::RepositoryError;

/// PostgreSQL repository for user storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Queries are checked
/// at runtime so the crate builds without a reachable database.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User::new(r.id, r.email, r.name, r.created_at)
    }
}

/// Escapes `LIKE` metacharacters so the pattern is matched as a plain substring.
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(User::from)
            .ok_or_else(|| RepositoryError::not_found("User not found", json!({ "id": id })))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(User::from).ok_or_else(|| {
            RepositoryError::not_found("User not found", json!({ "email": email }))
        })
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .fetch_one(self.pool.as_ref())
        .await?;

        tracing::debug!("Created user {} <{}>", row.id, row.email);

        Ok(row.into())
    }

    async fn update(&self, id: i64, changes: UpdateUser) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET email = $1, name = $2 WHERE id = $3")
            .bind(&changes.email)
            .bind(&changes.name)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                "User not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                "User not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_name_pattern(&self, pattern: &str) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(escape_like(pattern))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn get_recent(&self, days: u32) -> Result<Vec<User>, RepositoryError> {
        let days = i32::try_from(days).map_err(|_| {
            RepositoryError::invalid_input("Day window is too large", json!({ "days": days }))
        })?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE created_at >= NOW() - make_interval(days => $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(days)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
