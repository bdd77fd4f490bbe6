//! Redis cache client implementation
//!
//! A multiplexed async connection with retry on transient errors. The client
//! implements the core `CacheBackend` contract and exposes the counter
//! primitives the rate limiter builds on.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use cb_core::errors::CacheError;
use cb_core::services::cache::CacheBackend;

use crate::config::CacheConfig;
use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// KEYS[1] counter, ARGV[1] window in seconds (0 leaves the TTL alone)
const INCR_WITH_EXPIRY: &str = r"
local count = redis.call('INCR', KEYS[1])
local window = tonumber(ARGV[1])
if window > 0 and redis.call('TTL', KEYS[1]) < 0 then
    redis.call('EXPIRE', KEYS[1], window)
end
return count
";

/// Redis client with connection reuse and retry logic
#[derive(Clone)]
pub struct RedisClient {
    /// Shared multiplexed connection, cloned per operation
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Attempts per operation, including the first
    max_retries: u32,
    /// Initial backoff between attempts
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the retry budget from the configuration
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected client, or the last
    ///   connection error once every attempt failed
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        Self::new_with_retry_config(config, max_retries, 100).await
    }

    /// Connect with an explicit retry budget
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!("Connecting to Redis at {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(client, max_retries, retry_delay_ms).await?;
        info!("Redis client ready");

        Ok(Self {
            connection,
            config,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn connect_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Redis connection attempt {}/{} failed: {}. Retrying in {}ms",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Giving up on Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// SET with EX
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let (key_owned, value) = (key.to_string(), value.to_string());
        self.execute_with_retry(move |mut conn| {
            let (key, value) = (key_owned.clone(), value.clone());
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("SET '{}' failed: {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// GET; `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key_owned = key.to_string();
        let value = self
            .execute_with_retry(move |mut conn| {
                let key = key_owned.clone();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await
            .map_err(|e| {
                error!("GET '{}' failed: {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        debug!("GET '{}' hit: {}", key, value.is_some());
        Ok(value)
    }

    /// DEL; `true` when a key was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key_owned = key.to_string();
        let removed = self
            .execute_with_retry(move |mut conn| {
                let key = key_owned.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("DEL '{}' failed: {}", key, e);
                InfrastructureError::Cache(e)
            })?;
        Ok(removed > 0)
    }

    /// INCR, setting the expiry when the counter has none
    ///
    /// This is the fixed-window primitive: the first hit of a window starts
    /// the clock, later hits only count. Both steps run as one server-side
    /// script so a dropped connection cannot leave a counter without a TTL.
    /// INCR is not idempotent, so the call is attempted exactly once.
    pub async fn increment(
        &self,
        key: &str,
        expiry_seconds: Option<u64>,
    ) -> Result<i64, InfrastructureError> {
        let mut conn = self.connection.clone();
        redis::Script::new(INCR_WITH_EXPIRY)
            .key(key)
            .arg(expiry_seconds.unwrap_or(0))
            .invoke_async::<_, i64>(&mut conn)
            .await
            .map_err(|e| {
                error!("INCR '{}' failed: {}", key, e);
                InfrastructureError::Cache(e)
            })
    }

    /// EXPIRE; `true` when the key exists and now carries the expiry
    pub async fn expire(&self, key: &str, expiry_seconds: u64) -> Result<bool, InfrastructureError> {
        let key_owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            Box::pin(async move { conn.expire::<_, bool>(key, expiry_seconds as i64).await })
        })
        .await
        .map_err(|e| {
            error!("EXPIRE '{}' failed: {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Remaining lifetime of a key; `None` if absent or without expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key_owned = key.to_string();
        let ttl = self
            .execute_with_retry(move |mut conn| {
                let key = key_owned.clone();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok((ttl >= 0).then_some(ttl))
    }

    /// PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let reply = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if reply != "PONG" {
            warn!("Unexpected PING reply: {}", reply);
        }
        Ok(reply == "PONG")
    }

    /// Run an operation, retrying transient failures with exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        RedisClient::get(self, key).await.map_err(to_cache_error)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        RedisClient::set_with_expiry(self, key, value, ttl_seconds)
            .await
            .map_err(to_cache_error)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        RedisClient::delete(self, key).await.map_err(to_cache_error)
    }

    async fn ping(&self) -> Result<bool, CacheError> {
        self.health_check().await.map_err(to_cache_error)
    }
}

fn to_cache_error(e: InfrastructureError) -> CacheError {
    CacheError::Unavailable(e.to_string())
}

/// Whether an error is transient enough to retry
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide the credentials of a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
