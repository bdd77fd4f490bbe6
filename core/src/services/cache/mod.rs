//! Read-through user cache
//!
//! Maps an email to a serialized user record with a fixed lifetime. The cache
//! is an optimization only: every failure of the backend degrades to a miss
//! and callers fall through to the persistent store.

mod backend;
mod schema;
mod user_cache;

#[cfg(any(test, feature = "mock-services"))]
mod memory;

#[cfg(test)]
mod tests;

pub use backend::CacheBackend;
pub use schema::{CachedUser, UserSnapshot, USER_CACHE_SCHEMA_VERSION};
pub use user_cache::{user_cache_key, KeyValueUserCache, NoopUserCache, UserCache, UserCacheConfig};

#[cfg(any(test, feature = "mock-services"))]
pub use memory::{FailingCacheBackend, InMemoryCacheBackend, StallingCacheBackend};
