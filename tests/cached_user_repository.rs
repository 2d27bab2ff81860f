mod common;

use common::CountingRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use user_repository::application::{CachedUserRepository, user_cache_key};
use user_repository::domain::entities::{NewUser, UpdateUser, User};
use user_repository::domain::repositories::UserRepository;
use user_repository::infrastructure::cache::{CacheClient, MemoryCache, NullCache};

fn cached_repo(pool: &PgPool, cache: &MemoryCache) -> CachedUserRepository<CountingRepository> {
    CachedUserRepository::new(
        Arc::new(CountingRepository::new(pool.clone())),
        Arc::new(cache.clone()),
    )
}

async fn cached_user(cache: &MemoryCache, id: i64) -> Option<User> {
    cache
        .get(&user_cache_key(id))
        .await
        .unwrap()
        .map(|bytes| serde_json::from_slice(&bytes).unwrap())
}

#[sqlx::test]
async fn test_cache_miss_fetches_from_database(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    let user = repo.get_by_id_cached(alice_id).await.unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(repo.storage().get_by_id_calls(), 1);
    assert!(cache.contains_key(&format!("user:{}", alice_id)));
}

#[sqlx::test]
async fn test_cache_hit_skips_database(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    let first = repo.get_by_id_cached(alice_id).await.unwrap();
    let second = repo.get_by_id_cached(alice_id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.storage().get_by_id_calls(), 1);
}

#[sqlx::test]
async fn test_cached_matches_uncached(pool: PgPool) {
    let (alice_id, bob_id) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    for id in [alice_id, bob_id] {
        let direct = repo.storage().get_by_id(id).await.unwrap();
        let cold = repo.get_by_id_cached(id).await.unwrap();
        let warm = repo.get_by_id_cached(id).await.unwrap();

        assert_eq!(cold, direct);
        assert_eq!(warm, direct);
        assert_eq!(cached_user(&cache, id).await, Some(direct));
    }
}

#[sqlx::test]
async fn test_missing_user_is_not_cached(pool: PgPool) {
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    let result = repo.get_by_id_cached(99999).await;

    assert!(result.unwrap_err().is_not_found());
    assert!(!cache.contains_key("user:99999"));
    assert!(cache.is_empty());

    repo.get_by_id_cached(99999).await.unwrap_err();
    assert_eq!(repo.storage().get_by_id_calls(), 2);
}

#[sqlx::test]
async fn test_stale_until_invalidated(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    let user = repo.get_by_id_cached(alice_id).await.unwrap();
    assert_eq!(user.name, "Alice Smith");

    common::rename_directly(&pool, alice_id, "Alice Jones").await;

    let stale = repo.get_by_id_cached(alice_id).await.unwrap();
    assert_eq!(stale.name, "Alice Smith");

    repo.invalidate_cache(alice_id).await.unwrap();

    let fresh = repo.get_by_id_cached(alice_id).await.unwrap();
    assert_eq!(fresh.name, "Alice Jones");
    assert_eq!(repo.storage().get_by_id_calls(), 2);
}

#[sqlx::test]
async fn test_invalidation_is_idempotent(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    repo.get_by_id_cached(alice_id).await.unwrap();

    repo.invalidate_cache(alice_id).await.unwrap();
    assert!(cache.get(&user_cache_key(alice_id)).await.unwrap().is_none());

    repo.invalidate_cache(alice_id).await.unwrap();
    assert!(cache.is_empty());
}

#[sqlx::test]
async fn test_expired_entry_is_reloaded(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache).with_ttl(Duration::from_millis(50));

    repo.get_by_id_cached(alice_id).await.unwrap();
    common::rename_directly(&pool, alice_id, "Alice Jones").await;

    tokio::time::sleep(Duration::from_millis(100)).await;

    let user = repo.get_by_id_cached(alice_id).await.unwrap();
    assert_eq!(user.name, "Alice Jones");
    assert_eq!(repo.storage().get_by_id_calls(), 2);
}

#[sqlx::test]
async fn test_create_then_read_your_write(pool: PgPool) {
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    let created = repo
        .create_cached(NewUser::new("cached@example.com", "Cached User"))
        .await
        .unwrap();
    assert!(cache.is_empty());

    let fetched = repo.get_by_id_cached(created.id).await.unwrap();

    assert_eq!(fetched, created);
}

#[sqlx::test]
async fn test_update_cached_invalidates(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    repo.get_by_id_cached(alice_id).await.unwrap();

    repo.update_cached(
        alice_id,
        UpdateUser::new("alice.jones@example.com", "Alice Jones"),
    )
    .await
    .unwrap();

    assert!(!cache.contains_key(&user_cache_key(alice_id)));
    let user = repo.get_by_id_cached(alice_id).await.unwrap();
    assert_eq!(user.email, "alice.jones@example.com");
    assert_eq!(user.name, "Alice Jones");
}

#[sqlx::test]
async fn test_delete_cached_invalidates(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    repo.get_by_id_cached(alice_id).await.unwrap();
    repo.delete_cached(alice_id).await.unwrap();

    assert!(cache.is_empty());
    assert!(
        repo.get_by_id_cached(alice_id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[sqlx::test]
async fn test_multiple_cache_entries(pool: PgPool) {
    let (alice_id, bob_id) = common::seed_users(&pool).await;
    let cache = MemoryCache::new();
    let repo = cached_repo(&pool, &cache);

    repo.get_by_id_cached(alice_id).await.unwrap();
    repo.get_by_id_cached(bob_id).await.unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cached_user(&cache, bob_id).await.unwrap().name, "Bob Johnson");
}

#[sqlx::test]
async fn test_null_cache_always_reads_storage(pool: PgPool) {
    let (alice_id, _) = common::seed_users(&pool).await;
    let storage = Arc::new(CountingRepository::new(pool.clone()));
    let repo = CachedUserRepository::new(storage.clone(), Arc::new(NullCache::new()));

    repo.get_by_id_cached(alice_id).await.unwrap();
    repo.get_by_id_cached(alice_id).await.unwrap();

    assert_eq!(storage.get_by_id_calls(), 2);
}
