//! Error types for authentication, tokens, validation and caching
//!
//! Display strings are caller facing: the HTTP layer sends them as the
//! `message` of the error body, so they never carry internal detail.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; both look the same to the caller
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Confirmation token was valid but names no account
    #[error("Verification error")]
    VerificationFailed,

    #[error("Operation forbidden")]
    InsufficientPermissions,

    #[error("Too many requests")]
    RateLimitExceeded { retry_after_seconds: u64 },
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid scope for token")]
    PurposeMismatch,

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Invalid token for email verification")]
    InvalidEmailToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid length: {field} (min: {min}, max: {max})")]
    InvalidLength { field: String, min: usize, max: usize },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid image")]
    InvalidImage,
}

/// Cache backend failures
///
/// These never leave the user cache; they exist so backends can report what
/// went wrong and the cache can log it before degrading to a miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation timed out")]
    Timeout,

    #[error("Cache payload rejected: {0}")]
    Serialization(String),
}
