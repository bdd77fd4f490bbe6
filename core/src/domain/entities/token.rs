//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Email confirmation token expiration time (7 days)
pub const EMAIL_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Default JWT issuer
pub const JWT_ISSUER: &str = "contact-book";

/// What a token may be used for
///
/// Carried in the `scope` claim. A token is only ever accepted by the flow
/// matching its purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenPurpose {
    #[serde(rename = "access_token")]
    Access,
    #[serde(rename = "refresh_token")]
    Refresh,
    #[serde(rename = "email_token")]
    EmailConfirmation,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access_token",
            TokenPurpose::Refresh => "refresh_token",
            TokenPurpose::EmailConfirmation => "email_token",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Purpose tag
    pub scope: TokenPurpose,

    /// Issuer
    pub iss: String,

    /// JWT ID, keeps tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims for `subject` valid for `lifetime` starting at `issued_at`
    pub fn new(
        subject: impl Into<String>,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            scope: purpose,
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks expiry against the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Remaining lifetime in seconds, zero once expired
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.exp - now.timestamp()).max(0)
    }
}

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}
