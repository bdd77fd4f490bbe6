//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;

use cb_shared::config::JwtConfig;

use crate::domain::entities::token::{
    TokenPurpose, ACCESS_TOKEN_EXPIRY_MINUTES, EMAIL_TOKEN_EXPIRY_DAYS, JWT_ISSUER,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
    /// Email confirmation token expiry in days
    pub email_token_expiry_days: i64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_expiry_days: REFRESH_TOKEN_EXPIRY_DAYS,
            email_token_expiry_days: EMAIL_TOKEN_EXPIRY_DAYS,
            issuer: JWT_ISSUER.to_string(),
        }
    }
}

impl TokenServiceConfig {
    /// Build from the shared JWT configuration
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = match config.algorithm.to_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(DomainError::Internal {
                    message: format!("Unsupported JWT algorithm: {}", other),
                })
            }
        };

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
            email_token_expiry_days: config.email_token_expiry_days,
            issuer: config.issuer.clone(),
        })
    }

    /// Lifetime of a token of the given purpose
    pub fn lifetime(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Access => Duration::minutes(self.access_token_expiry_minutes),
            TokenPurpose::Refresh => Duration::days(self.refresh_token_expiry_days),
            TokenPurpose::EmailConfirmation => Duration::days(self.email_token_expiry_days),
        }
    }
}
