//! Redis-based fixed-window rate limiter

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use cb_core::services::rate_limit::{RateDecision, RateLimiterTrait};
use cb_shared::config::rate_limit::EndpointLimit;

use crate::cache::redis_client::RedisClient;

/// Counts requests per key in windows that start at the first hit
///
/// The counter key expires with the window, so no cleanup is needed.
pub struct RedisRateLimiter {
    redis_client: Option<Arc<RedisClient>>,
}

impl RedisRateLimiter {
    pub fn new(redis_client: Arc<RedisClient>) -> Self {
        Self {
            redis_client: Some(redis_client),
        }
    }

    /// Limiter for a process that could not reach Redis; every hit errors
    pub fn unavailable() -> Self {
        Self { redis_client: None }
    }

    fn client(&self) -> Result<&RedisClient, String> {
        self.redis_client
            .as_deref()
            .ok_or_else(|| "rate limiter has no Redis connection".to_string())
    }

    /// Drop the counter behind `key`, opening a fresh window
    pub async fn reset(&self, key: &str) -> Result<(), String> {
        self.client()?
            .delete(key)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn hit(&self, key: &str, limit: EndpointLimit) -> Result<RateDecision, String> {
        let client = self.client()?;
        let count = client
            .increment(key, Some(limit.window_seconds))
            .await
            .map_err(|e| e.to_string())?;

        if count <= i64::from(limit.max_requests) {
            return Ok(RateDecision::allow());
        }

        let retry_after = match client.ttl(key).await.map_err(|e| e.to_string())? {
            Some(ttl) => ttl.max(1) as u64,
            None => {
                // A counter without expiry would deny the key forever
                warn!("Counter '{}' had no expiry, restarting its window", key);
                client
                    .expire(key, limit.window_seconds)
                    .await
                    .map_err(|e| e.to_string())?;
                limit.window_seconds
            }
        };
        debug!("Rate limit exceeded for '{}' ({} hits)", key, count);

        Ok(RateDecision::deny(retry_after))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_limiter_reports_errors() {
        let limiter = RedisRateLimiter::unavailable();
        assert!(limiter.hit("rate_limit:k", EndpointLimit::new(2, 5)).await.is_err());
        assert!(limiter.reset("rate_limit:k").await.is_err());
    }
}
