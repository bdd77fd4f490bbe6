//! Key-value backend contract behind the user cache.

use async_trait::async_trait;

use crate::errors::CacheError;

/// A networked key-value store with per-key expiry
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// `Ok(None)` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl_seconds`
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), CacheError>;

    /// `Ok(true)` when a key was removed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Round trip used by health checks
    async fn ping(&self) -> Result<bool, CacheError>;
}
