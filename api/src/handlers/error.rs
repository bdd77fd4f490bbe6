//! Mapping of domain failures onto status codes and error bodies.
//!
//! Every failing handler returns an [`ApiError`]; its `ResponseError`
//! implementation is the only place that decides status codes.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use validator::ValidationErrors;

use cb_core::errors::{AuthError, DomainError, TokenError};
use cb_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Error returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request body or query failed field validation
    #[error("Invalid request")]
    InvalidBody(#[from] ValidationErrors),

    /// Request could not be decoded at all
    #[error("{0}")]
    Malformed(String),

    /// Request body exceeded the accepted size
    #[error("Payload too large")]
    PayloadTooLarge,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => domain_code(e),
            ApiError::InvalidBody(_) | ApiError::Malformed(_) => error_codes::VALIDATION_ERROR,
            ApiError::PayloadTooLarge => error_codes::PAYLOAD_TOO_LARGE,
        }
    }

    /// Message sent to the caller; store and internal failures stay vague
    fn public_message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::ServiceUnavailable { .. }) => {
                "Service temporarily unavailable".to_string()
            }
            ApiError::Domain(DomainError::Internal { .. })
            | ApiError::Domain(DomainError::Token(TokenError::TokenGenerationFailed)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden => StatusCode::FORBIDDEN,
        DomainError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials
            | AuthError::EmailNotConfirmed
            | AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::VerificationFailed => StatusCode::BAD_REQUEST,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        },
        DomainError::Token(token) => match token {
            TokenError::InvalidEmailToken => StatusCode::UNPROCESSABLE_ENTITY,
            TokenError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        },
    }
}

fn domain_code(error: &DomainError) -> &'static str {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => {
            error_codes::VALIDATION_ERROR
        }
        DomainError::NotFound { .. } => error_codes::NOT_FOUND,
        DomainError::Conflict { .. } => error_codes::CONFLICT,
        DomainError::Unauthorized => error_codes::UNAUTHORIZED,
        DomainError::Forbidden => error_codes::FORBIDDEN,
        DomainError::ServiceUnavailable { .. } => error_codes::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::EmailNotConfirmed => error_codes::EMAIL_NOT_CONFIRMED,
            AuthError::InvalidRefreshToken => error_codes::TOKEN_INVALID,
            AuthError::VerificationFailed => error_codes::BAD_REQUEST,
            AuthError::InsufficientPermissions => error_codes::FORBIDDEN,
            AuthError::RateLimitExceeded { .. } => error_codes::RATE_LIMIT_EXCEEDED,
        },
        DomainError::Token(token) => match token {
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidEmailToken => error_codes::VALIDATION_ERROR,
            TokenError::TokenGenerationFailed => error_codes::INTERNAL_ERROR,
            _ => error_codes::TOKEN_INVALID,
        },
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => domain_status(e),
            ApiError::InvalidBody(_) | ApiError::Malformed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected with {}: {}", status, self);
        }

        let mut body = ErrorResponse::new(self.code(), self.public_message());
        if let ApiError::InvalidBody(errors) = self {
            for (field, problems) in errors.field_errors() {
                let codes: Vec<String> = problems.iter().map(|p| p.code.to_string()).collect();
                body = body.add_detail(field.to_string(), codes);
            }
        }

        let mut response = body.to_response(status);
        let headers = response.headers_mut();
        match self {
            ApiError::Domain(DomainError::Auth(AuthError::RateLimitExceeded {
                retry_after_seconds,
            })) => {
                if let Ok(value) = header::HeaderValue::from_str(&retry_after_seconds.to_string())
                {
                    headers.insert(header::RETRY_AFTER, value);
                }
            }
            _ if status == StatusCode::UNAUTHORIZED => {
                headers.insert(
                    header::WWW_AUTHENTICATE,
                    header::HeaderValue::from_static("Bearer"),
                );
            }
            _ => {}
        }
        response
    }
}

/// Undecodable JSON bodies answer 422 in the standard error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::PayloadTooLarge.into()
        }
        other => ApiError::Malformed(other.to_string()).into(),
    }
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Malformed(err.to_string()).into()
}

/// Unparseable path segments (a malformed id) read as a missing resource
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path: {}", err);
    ApiError::Domain(DomainError::not_found("Not found")).into()
}
