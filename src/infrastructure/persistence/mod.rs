//! PostgreSQL repository implementations.
//!
//! - [`PgUserRepository`] - User storage and retrieval
//! - [`connect_pool`] / [`run_migrations`] - Pool construction and schema setup

pub mod pg_user_repository;
pub mod pool;

pub use pg_user_repository::PgUserRepository;
pub use pool::{connect_pool, run_migrations};
