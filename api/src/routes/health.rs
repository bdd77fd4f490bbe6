//! Liveness endpoint backed by a store round trip

use actix_web::{http::StatusCode, web, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};
use cb_shared::errors::error_codes;
use cb_shared::types::HealthResponse;

use crate::app::AppState;
use crate::dto::{ErrorResponse, ErrorResponseExt};

pub fn configure<U, C, M, S, R>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    cfg.route("/healthchecker", web::get().to(healthchecker::<U, C, M, S, R>));
}

/// Handler for GET /api/healthchecker
///
/// 200 when the user store answers; the cache state is reported but never
/// fails the check.
pub async fn healthchecker<U, C, M, S, R>(state: web::Data<AppState<U, C, M, S, R>>) -> HttpResponse
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    match state.user_repository.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            message: "Welcome to the contact book API!".to_string(),
            cache: state.user_cache.is_healthy().await,
        }),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "Error connecting to the database")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
