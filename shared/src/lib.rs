//! Shared utilities and common types for the contact book server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Utility functions (email validation, log masking)
//! - Pagination and response types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment, JwtConfig,
    LoggingConfig, RateLimitConfig, ServerConfig, StorageConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse};
pub use types::{HealthResponse, MessageResponse, Pagination};
pub use utils::validation;
