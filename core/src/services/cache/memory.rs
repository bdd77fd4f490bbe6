//! In-process cache backends for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::errors::CacheError;
use crate::services::clock::Clock;

use super::backend::CacheBackend;

/// Map-backed store whose expiry follows an injected clock
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, (String, DateTime<Utc>)>>,
    clock: Arc<dyn Clock>,
    simulate_failure: AtomicBool,
}

impl InMemoryCacheBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            simulate_failure: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the server were down
    pub fn set_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    /// Raw stored payload, ignoring expiry
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).map(|(v, _)| v.clone())
    }

    /// Write a payload directly, bypassing the cache layer
    pub async fn insert_raw(&self, key: &str, value: &str, ttl_seconds: u64) {
        let expires_at = self.clock.now() + Duration::seconds(ttl_seconds as i64);
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), expires_at));
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value.clone()))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        self.check_available()?;
        self.insert_raw(key, value, ttl_seconds).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.check_available()?;
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn ping(&self) -> Result<bool, CacheError> {
        self.check_available()?;
        Ok(true)
    }
}

/// Backend whose every call errors
#[derive(Debug, Default)]
pub struct FailingCacheBackend;

#[async_trait]
impl CacheBackend for FailingCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_with_expiry(&self, _: &str, _: &str, _: u64) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// Backend whose calls never complete
#[derive(Debug, Default)]
pub struct StallingCacheBackend;

#[async_trait]
impl CacheBackend for StallingCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }

    async fn set_with_expiry(&self, _: &str, _: &str, _: u64) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<bool, CacheError> {
        std::future::pending().await
    }
}
