#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use user_repository::domain::entities::{NewUser, UpdateUser, User};
use user_repository::domain::repositories::UserRepository;
use user_repository::error::RepositoryError;
use user_repository::infrastructure::persistence::PgUserRepository;

pub async fn create_test_user(pool: &PgPool, email: &str, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (email, name) VALUES ($1, $2) RETURNING id")
        .bind(email)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_user_days_ago(pool: &PgPool, email: &str, name: &str, days: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (email, name, created_at) VALUES ($1, $2, NOW() - make_interval(days => $3)) RETURNING id",
    )
    .bind(email)
    .bind(name)
    .bind(days)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Seeds the two users every scenario starts from.
pub async fn seed_users(pool: &PgPool) -> (i64, i64) {
    let alice = create_test_user(pool, "alice@example.com", "Alice Smith").await;
    let bob = create_test_user(pool, "bob@example.com", "Bob Johnson").await;
    (alice, bob)
}

/// Renames a user with raw SQL, bypassing every repository.
pub async fn rename_directly(pool: &PgPool, id: i64, name: &str) {
    sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

/// Storage wrapper that counts primary-key reads.
pub struct CountingRepository {
    inner: PgUserRepository,
    get_by_id_calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: PgUserRepository::new(Arc::new(pool)),
            get_by_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn get_by_id_calls(&self) -> usize {
        self.get_by_id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        self.inner.get_by_email(email).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        self.inner.create(new_user).await
    }

    async fn update(&self, id: i64, changes: UpdateUser) -> Result<(), RepositoryError> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.inner.list().await
    }

    async fn find_by_name_pattern(&self, pattern: &str) -> Result<Vec<User>, RepositoryError> {
        self.inner.find_by_name_pattern(pattern).await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        self.inner.count().await
    }

    async fn get_recent(&self, days: u32) -> Result<Vec<User>, RepositoryError> {
        self.inner.get_recent(days).await
    }
}
