//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Whether the user cache is enabled at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Upper bound for a single cache round trip, in milliseconds
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,

    /// Lifetime of a cached user record in seconds
    #[serde(default = "default_user_ttl")]
    pub user_ttl_seconds: u64,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Enable cache key prefix
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            enabled: default_enabled(),
            op_timeout_ms: default_op_timeout_ms(),
            user_ttl_seconds: default_user_ttl(),
            max_retries: default_max_retries(),
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Self {
            url,
            enabled: env_or("USER_CACHE_ENABLED", default_enabled()),
            op_timeout_ms: env_or("REDIS_OP_TIMEOUT_MS", default_op_timeout_ms()),
            user_ttl_seconds: env_or("USER_CACHE_TTL_SECONDS", default_user_ttl()),
            max_retries: env_or("REDIS_MAX_RETRIES", default_max_retries()),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").ok().filter(|p| !p.is_empty()),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

fn default_enabled() -> bool {
    true
}

fn default_op_timeout_ms() -> u64 {
    250
}

fn default_user_ttl() -> u64 {
    900 // 15 minutes
}

fn default_max_retries() -> u32 {
    3
}
