//! Infrastructure implementations of core service traits

pub mod rate_limiter;

#[cfg(test)]
mod tests;

pub use rate_limiter::RedisRateLimiter;
