//! Cache module for Redis-backed storage
//!
//! Provides the Redis client used as the user cache backend and as the
//! counter store of the rate limiter.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use cb_shared::config::cache::CacheConfig;
