use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::user::{Role, User};
use crate::services::clock::ManualClock;

use super::*;

fn sample_user() -> User {
    User::new(
        "alice".to_string(),
        "a@x.com".to_string(),
        "$2b$04$abcdefghijklmnopqrstuu".to_string(),
    )
    .with_role(Role::Moderator)
}

fn setup() -> (
    KeyValueUserCache<InMemoryCacheBackend>,
    Arc<InMemoryCacheBackend>,
    Arc<ManualClock>,
) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    ));
    let backend = Arc::new(InMemoryCacheBackend::new(clock.clone()));
    let cache = KeyValueUserCache::new(backend.clone(), UserCacheConfig::default());
    (cache, backend, clock)
}

#[tokio::test]
async fn test_put_then_get_returns_equal_user() {
    let (cache, backend, _) = setup();
    let user = sample_user();

    cache.put(&user).await;

    assert_eq!(cache.get("a@x.com").await, Some(user));
    assert!(backend.raw("user:a@x.com").await.is_some());
    assert!(cache.get("b@x.com").await.is_none());
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let (cache, _, clock) = setup();
    cache.put(&sample_user()).await;

    clock.advance(Duration::seconds(899));
    assert!(cache.get("a@x.com").await.is_some());

    clock.advance(Duration::seconds(1));
    assert!(cache.get("a@x.com").await.is_none());
}

#[tokio::test]
async fn test_put_overwrites_previous_entry() {
    let (cache, _, _) = setup();
    let mut user = sample_user();
    cache.put(&user).await;

    user.confirm();
    user.set_refresh_token(Some("r2".to_string()));
    cache.put(&user).await;

    let cached = cache.get("a@x.com").await.unwrap();
    assert!(cached.confirmed);
    assert_eq!(cached.refresh_token.as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_invalidate_removes_entry() {
    let (cache, _, _) = setup();
    cache.put(&sample_user()).await;

    cache.invalidate("a@x.com").await;

    assert!(cache.get("a@x.com").await.is_none());
}

#[tokio::test]
async fn test_foreign_schema_version_is_a_miss() {
    let (cache, backend, _) = setup();
    let encoded = CachedUser::encode(&sample_user()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    value["schema_version"] = serde_json::json!(USER_CACHE_SCHEMA_VERSION + 1);
    backend
        .insert_raw("user:a@x.com", &value.to_string(), 900)
        .await;

    assert!(cache.get("a@x.com").await.is_none());
}

#[tokio::test]
async fn test_garbage_payload_is_a_miss() {
    let (cache, backend, _) = setup();
    backend.insert_raw("user:a@x.com", "{not json", 900).await;

    assert!(cache.get("a@x.com").await.is_none());
}

#[tokio::test]
async fn test_backend_failures_are_absorbed() {
    let cache = KeyValueUserCache::new(
        Arc::new(FailingCacheBackend),
        UserCacheConfig::default(),
    );
    let user = sample_user();

    cache.put(&user).await;
    cache.invalidate(&user.email).await;
    assert!(cache.get(&user.email).await.is_none());
    assert!(!cache.is_healthy().await);
}

#[tokio::test]
async fn test_stalled_backend_times_out_as_miss() {
    let cache = KeyValueUserCache::new(
        Arc::new(StallingCacheBackend),
        UserCacheConfig {
            op_timeout: StdDuration::from_millis(20),
            ..Default::default()
        },
    );

    assert!(cache.get("a@x.com").await.is_none());
    cache.put(&sample_user()).await;
    assert!(!cache.is_healthy().await);
}

#[tokio::test]
async fn test_key_prefix_is_applied() {
    let clock = Arc::new(ManualClock::default());
    let backend = Arc::new(InMemoryCacheBackend::new(clock));
    let cache = KeyValueUserCache::new(
        backend.clone(),
        UserCacheConfig {
            key_prefix: Some("cb".to_string()),
            ..Default::default()
        },
    );

    cache.put(&sample_user()).await;

    assert!(backend.raw("cb:user:a@x.com").await.is_some());
    assert!(backend.raw("user:a@x.com").await.is_none());
}

#[tokio::test]
async fn test_noop_cache_never_hits() {
    let cache = NoopUserCache;
    cache.put(&sample_user()).await;
    assert!(cache.get("a@x.com").await.is_none());
    assert!(!cache.is_healthy().await);
}
