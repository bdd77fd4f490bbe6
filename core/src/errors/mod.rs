//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, CacheError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Operation forbidden")]
    Forbidden,

    /// The persistent store (or another required collaborator) failed
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    pub fn store_failure(message: impl Into<String>) -> Self {
        DomainError::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Whether the caller should see this as an authentication failure
    pub fn is_unauthorized(&self) -> bool {
        match self {
            DomainError::Unauthorized => true,
            DomainError::Token(e) => !matches!(
                e,
                TokenError::TokenGenerationFailed | TokenError::InvalidEmailToken
            ),
            DomainError::Auth(e) => matches!(
                e,
                AuthError::InvalidCredentials
                    | AuthError::EmailNotConfirmed
                    | AuthError::InvalidRefreshToken
            ),
            _ => false,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
