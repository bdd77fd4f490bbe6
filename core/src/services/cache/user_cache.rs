//! User cache contract plus the two shipped implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use cb_shared::config::CacheConfig;

use crate::domain::entities::user::User;
use crate::errors::CacheError;

use super::backend::CacheBackend;
use super::schema::CachedUser;

/// Fail-open cache of users keyed by email
///
/// None of these operations can fail from the caller's point of view: a
/// broken backend looks like an empty cache.
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Cached user, or `None` on miss, expiry, decode failure or backend failure
    async fn get(&self, email: &str) -> Option<User>;

    /// Store (or overwrite) the user under its email
    async fn put(&self, user: &User);

    /// Drop the entry for `email`
    async fn invalidate(&self, email: &str);

    /// Whether the backend answered a ping
    async fn is_healthy(&self) -> bool;
}

/// Key under which a user is stored, before any deployment prefix
pub fn user_cache_key(email: &str) -> String {
    format!("user:{}", email)
}

/// Settings for [`KeyValueUserCache`]
#[derive(Debug, Clone)]
pub struct UserCacheConfig {
    /// Lifetime of an entry
    pub ttl_seconds: u64,
    /// Upper bound on a single backend round trip
    pub op_timeout: Duration,
    /// Optional namespace prepended to every key
    pub key_prefix: Option<String>,
}

impl Default for UserCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 900,
            op_timeout: Duration::from_millis(250),
            key_prefix: None,
        }
    }
}

impl From<&CacheConfig> for UserCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            ttl_seconds: config.user_ttl_seconds,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
            key_prefix: config.key_prefix.clone(),
        }
    }
}

/// User cache over any [`CacheBackend`]
pub struct KeyValueUserCache<B: CacheBackend> {
    backend: Arc<B>,
    config: UserCacheConfig,
}

impl<B: CacheBackend> KeyValueUserCache<B> {
    pub fn new(backend: Arc<B>, config: UserCacheConfig) -> Self {
        Self { backend, config }
    }

    fn key(&self, email: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, user_cache_key(email)),
            None => user_cache_key(email),
        }
    }

    /// Bounds a backend call by the configured timeout
    async fn bounded<T, F>(&self, op: F) -> Result<T, CacheError>
    where
        F: std::future::Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.config.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl<B: CacheBackend + 'static> UserCache for KeyValueUserCache<B> {
    async fn get(&self, email: &str) -> Option<User> {
        let key = self.key(email);
        let payload = match self.bounded(self.backend.get(&key)).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("User cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!("User cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match CachedUser::decode(&payload) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn put(&self, user: &User) {
        let key = self.key(&user.email);
        let payload = match CachedUser::encode(user) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not serialize user for cache: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .bounded(
                self.backend
                    .set_with_expiry(&key, &payload, self.config.ttl_seconds),
            )
            .await
        {
            warn!("User cache write failed for {}: {}", key, e);
        }
    }

    async fn invalidate(&self, email: &str) {
        let key = self.key(email);
        if let Err(e) = self.bounded(self.backend.delete(&key)).await {
            warn!("User cache invalidation failed for {}: {}", key, e);
        }
    }

    async fn is_healthy(&self) -> bool {
        self.bounded(self.backend.ping()).await.unwrap_or(false)
    }
}

/// Cache that never holds anything
///
/// Used when caching is disabled or the backend could not be reached at
/// startup; every read goes to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUserCache;

#[async_trait]
impl UserCache for NoopUserCache {
    async fn get(&self, _email: &str) -> Option<User> {
        None
    }

    async fn put(&self, _user: &User) {}

    async fn invalidate(&self, _email: &str) {}

    async fn is_healthy(&self) -> bool {
        false
    }
}
