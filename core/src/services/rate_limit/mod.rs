//! Per-caller request budgets

use async_trait::async_trait;

use cb_shared::config::rate_limit::EndpointLimit;

/// Outcome of counting one request against a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Seconds until the current window resets
    pub retry_after_seconds: u64,
}

impl RateDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            retry_after_seconds: 0,
        }
    }

    pub fn deny(retry_after_seconds: u64) -> Self {
        Self {
            allowed: false,
            retry_after_seconds,
        }
    }
}

/// Fixed-window rate limiter
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count one request under `key` and decide whether it may proceed
    async fn hit(&self, key: &str, limit: EndpointLimit) -> Result<RateDecision, String>;
}

/// Key of the contact creation budget for one user
pub fn create_contact_key(user_id: &uuid::Uuid) -> String {
    format!("rate_limit:create_contact:{}", user_id)
}

#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockRateLimiter;

#[cfg(any(test, feature = "mock-services"))]
mod mock {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    use cb_shared::config::rate_limit::EndpointLimit;

    use super::{RateDecision, RateLimiterTrait};

    /// Counts hits per key with windows that never roll over
    pub struct MockRateLimiter {
        counts: Mutex<HashMap<String, u32>>,
        should_fail: AtomicBool,
    }

    impl MockRateLimiter {
        pub fn new() -> Self {
            Self {
                counts: Mutex::new(HashMap::new()),
                should_fail: AtomicBool::new(false),
            }
        }

        pub fn set_failure(&self, fail: bool) {
            self.should_fail.store(fail, Ordering::SeqCst);
        }

        /// Start a fresh window for every key
        pub async fn reset(&self) {
            self.counts.lock().await.clear();
        }
    }

    impl Default for MockRateLimiter {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl RateLimiterTrait for MockRateLimiter {
        async fn hit(&self, key: &str, limit: EndpointLimit) -> Result<RateDecision, String> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err("rate limiter unavailable".to_string());
            }
            let mut counts = self.counts.lock().await;
            let count = counts.entry(key.to_string()).or_insert(0);
            *count += 1;
            if *count > limit.max_requests {
                Ok(RateDecision::deny(limit.window_seconds))
            } else {
                Ok(RateDecision::allow())
            }
        }
    }
}
