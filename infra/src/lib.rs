//! # Infrastructure Layer
//!
//! Concrete implementations of the contracts declared in `cb_core`:
//!
//! - **Database**: MySQL repositories for users and contacts using SQLx
//! - **Cache**: Redis client backing the user cache and the rate limiter
//! - **Email**: confirmation mail delivery through an HTTP relay or the log
//! - **Storage**: avatar uploads to Cloudinary
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)
//! - `mock-services`: Enable the core mock implementations for testing

use cb_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and operations
pub mod cache;

/// Email module - confirmation mail delivery
pub mod email;

/// Storage module - avatar image hosting
pub mod storage;

/// Services module - Infrastructure service implementations
pub mod services;

/// Configuration types consumed by this crate
pub mod config {
    pub use cb_shared::config::{CacheConfig, DatabaseConfig, EmailConfig, StorageConfig};
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail relay rejected or failed a message
    #[error("Email service error: {0}")]
    Email(String),

    /// Image storage rejected or failed an upload
    #[error("Storage error: {0}")]
    Storage(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        tracing::error!("{}", err);
        DomainError::store_failure(err.to_string())
    }
}
