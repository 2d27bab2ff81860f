//! Application layer: components that orchestrate storage and cache.
//!
//! - [`CachedUserRepository`] - read-through cache over [`crate::domain::repositories::UserRepository`]

pub mod cached_user_repository;

pub use cached_user_repository::{CachedUserRepository, DEFAULT_CACHE_TTL, user_cache_key};
