//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and token lifetimes
//! - `cache` - Redis connection and user cache settings
//! - `database` - Database connection and pool configuration
//! - `email` - Outbound confirmation mail relay
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Per-user request limits
//! - `server` - HTTP server and CORS
//! - `storage` - Avatar image storage

pub mod auth;
pub mod cache;
pub mod database;
pub mod email;
pub mod environment;
pub mod rate_limit;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProvider};
pub use environment::{Environment, LoggingConfig};
pub use rate_limit::{EndpointLimit, RateLimitConfig};
pub use server::{CorsConfig, ServerConfig};
pub use storage::StorageConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            email: EmailConfig::default(),
            storage: StorageConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::default(),
            email: EmailConfig::from_env(),
            storage: StorageConfig::from_env(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Configuration problems worth a startup warning
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            warnings.push("JWT_SECRET is not set; tokens are signed with the development secret".to_string());
        }
        if self.environment.is_production() && self.email.provider == EmailProvider::Mock {
            warnings.push("EMAIL_PROVIDER is mock; confirmation mails are only logged".to_string());
        }
        warnings
    }
}

/// Read an environment variable and parse it, falling back on any failure
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
