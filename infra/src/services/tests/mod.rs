//! Rate limiter tests against a live Redis
//!
//! Run with: cargo test -p cb_infra -- --ignored

use std::sync::Arc;

use cb_core::services::rate_limit::RateLimiterTrait;
use cb_shared::config::rate_limit::EndpointLimit;
use uuid::Uuid;

use crate::cache::{CacheConfig, RedisClient};
use crate::services::RedisRateLimiter;

async fn client() -> Arc<RedisClient> {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    Arc::new(RedisClient::new(CacheConfig::new(url)).await.unwrap())
}

async fn limiter() -> RedisRateLimiter {
    RedisRateLimiter::new(client().await)
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_budget_is_enforced_within_window() {
    let limiter = limiter().await;
    let key = format!("rate_limit:test:{}", Uuid::new_v4());
    let limit = EndpointLimit::new(2, 5);

    assert!(limiter.hit(&key, limit).await.unwrap().allowed);
    assert!(limiter.hit(&key, limit).await.unwrap().allowed);

    let denied = limiter.hit(&key, limit).await.unwrap();
    assert!(!denied.allowed);
    assert!((1..=5).contains(&denied.retry_after_seconds));

    limiter.reset(&key).await.unwrap();
    assert!(limiter.hit(&key, limit).await.unwrap().allowed);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_window_expires() {
    let limiter = limiter().await;
    let key = format!("rate_limit:test:{}", Uuid::new_v4());
    let limit = EndpointLimit::new(1, 1);

    assert!(limiter.hit(&key, limit).await.unwrap().allowed);
    assert!(!limiter.hit(&key, limit).await.unwrap().allowed);

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert!(limiter.hit(&key, limit).await.unwrap().allowed);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_counter_without_expiry_gets_window_back() {
    let client = client().await;
    let limiter = RedisRateLimiter::new(client.clone());
    let key = format!("rate_limit:test:{}", Uuid::new_v4());
    let limit = EndpointLimit::new(2, 5);

    // Counter left behind with no TTL, as after an interrupted window start
    client.increment(&key, None).await.unwrap();
    client.increment(&key, None).await.unwrap();
    assert_eq!(client.ttl(&key).await.unwrap(), None);

    let denied = limiter.hit(&key, limit).await.unwrap();
    assert!(!denied.allowed);
    assert!((1..=5).contains(&denied.retry_after_seconds));

    let ttl = client.ttl(&key).await.unwrap();
    assert!(matches!(ttl, Some(1..=5)));

    limiter.reset(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_increment_starts_window_once() {
    let client = client().await;
    let key = format!("rate_limit:test:{}", Uuid::new_v4());

    assert_eq!(client.increment(&key, Some(5)).await.unwrap(), 1);
    assert!(matches!(client.ttl(&key).await.unwrap(), Some(1..=5)));
    assert_eq!(client.increment(&key, Some(60)).await.unwrap(), 2);
    assert!(matches!(client.ttl(&key).await.unwrap(), Some(1..=5)));

    client.delete(&key).await.unwrap();
}
