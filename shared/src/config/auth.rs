//! Token signing configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Algorithm for JWT signing (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// Email confirmation token lifetime in days
    pub email_token_expiry_days: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            algorithm: default_algorithm(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            email_token_expiry_days: 7,
            issuer: String::from("contact-book"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            access_token_expiry_minutes: env_or(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                defaults.access_token_expiry_minutes,
            ),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                defaults.refresh_token_expiry_days,
            ),
            email_token_expiry_days: env_or(
                "JWT_EMAIL_TOKEN_EXPIRY_DAYS",
                defaults.email_token_expiry_days,
            ),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}
