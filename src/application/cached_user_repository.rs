//! Cache-aside wrapper around the user repository.
//!
//! # Read path
//!
//! 1. Look up `user:<id>` in the cache
//! 2. On a hit that decodes to the requested user, return it without touching storage
//! 3. Otherwise (miss, undecodable value, cache error) read from storage
//! 4. On success, write the record back with the configured TTL (best-effort)
//!
//! Storage `NotFound` is never cached.
//!
//! # Consistency
//!
//! Storage is authoritative. A cached entry may be stale for up to one TTL after a
//! mutation that bypasses this wrapper. Mutations routed through
//! [`CachedUserRepository::update_cached`] and [`CachedUserRepository::delete_cached`]
//! invalidate only after the storage call has returned successfully, so a concurrent
//! reader can at worst repopulate the pre-mutation value during that short window.
//! There is no locking and no request coalescing: simultaneous misses on one id each
//! read storage.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewUser, UpdateUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::RepositoryError;
use crate::infrastructure::cache::CacheClient;

/// TTL applied to cached users unless overridden with [`CachedUserRepository::with_ttl`].
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the user with primary key `id`.
pub fn user_cache_key(id: i64) -> String {
    format!("user:{id}")
}

/// User repository with a read-through cache on primary-key lookups.
///
/// Only `get_by_id_cached` reads the cache. All other lookups are available
/// uncached through [`Self::storage`].
pub struct CachedUserRepository<R: UserRepository + ?Sized> {
    storage: Arc<R>,
    cache: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl<R: UserRepository + ?Sized> CachedUserRepository<R> {
    /// Creates a cached repository with [`DEFAULT_CACHE_TTL`].
    pub fn new(storage: Arc<R>, cache: Arc<dyn CacheClient>) -> Self {
        Self {
            storage,
            cache,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Overrides the TTL used when populating the cache.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The wrapped storage repository.
    pub fn storage(&self) -> &R {
        self.storage.as_ref()
    }

    /// Fetches a user by id, serving from cache when possible.
    ///
    /// Cache failures never reach the caller; they degrade to a storage read.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if storage has no such user.
    /// Returns [`RepositoryError::Storage`] if the storage read fails.
    pub async fn get_by_id_cached(&self, id: i64) -> Result<User, RepositoryError> {
        let key = user_cache_key(id);

        if let Some(user) = self.read_cached(&key, id).await {
            metrics::counter!("user_cache_hits_total").increment(1);
            return Ok(user);
        }
        metrics::counter!("user_cache_misses_total").increment(1);

        let user = self.storage.get_by_id(id).await?;
        self.populate(&key, &user).await;

        Ok(user)
    }

    /// Removes the cached entry for `id`. Succeeds if nothing was cached.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Cache`] if the cache backend could not be reached;
    /// the entry may still be present.
    pub async fn invalidate_cache(&self, id: i64) -> Result<(), RepositoryError> {
        let key = user_cache_key(id);

        self.cache.delete(&key).await.map_err(|e| {
            warn!("Cache invalidation failed for {}: {}", key, e);
            RepositoryError::cache(
                "Failed to invalidate cache entry",
                json!({ "key": key, "reason": e.to_string() }),
            )
        })?;

        debug!("Cache INVALIDATE: {}", key);
        Ok(())
    }

    /// Creates a user in storage. The cache is neither primed nor invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ConstraintViolation`] if the email already exists.
    pub async fn create_cached(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        self.storage.create(new_user).await
    }

    /// Updates a user in storage, then invalidates its cache entry.
    ///
    /// # Errors
    ///
    /// Storage errors are returned as-is and leave the cache untouched.
    /// Returns [`RepositoryError::Cache`] if the update committed but invalidation
    /// failed; the old value may then be served until the TTL elapses.
    pub async fn update_cached(&self, id: i64, changes: UpdateUser) -> Result<(), RepositoryError> {
        self.storage.update(id, changes).await?;
        self.invalidate_cache(id).await
    }

    /// Deletes a user from storage, then invalidates its cache entry.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::update_cached`].
    pub async fn delete_cached(&self, id: i64) -> Result<(), RepositoryError> {
        self.storage.delete(id).await?;
        self.invalidate_cache(id).await
    }

    async fn read_cached(&self, key: &str, id: i64) -> Option<User> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache GET failed for {}: {}. Falling back to storage", key, e);
                return None;
            }
        };

        match serde_json::from_slice::<User>(&bytes) {
            Ok(user) if user.id == id => {
                debug!("Cache HIT: {}", key);
                Some(user)
            }
            Ok(user) => {
                warn!("Cache entry {} holds user {}, ignoring", key, user.id);
                None
            }
            Err(e) => {
                warn!("Cache entry {} is not a valid user: {}", key, e);
                None
            }
        }
    }

    /// Best-effort write; failures are logged and discarded.
    async fn populate(&self, key: &str, user: &User) {
        let bytes = match serde_json::to_vec(user) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode user {} for cache: {}", user.id, e);
                return;
            }
        };

        match self.cache.set(key, &bytes, self.ttl).await {
            Ok(()) => debug!("Cache SET: {} (TTL: {}s)", key, self.ttl.as_secs()),
            Err(e) => warn!("Cache SET failed for {}: {}", key, e),
        }
    }
}
