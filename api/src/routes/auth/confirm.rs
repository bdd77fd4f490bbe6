use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};
use cb_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::auth::RequestEmail;
use crate::handlers::ApiError;

/// Handler for GET /api/auth/confirmed_email/{token}
///
/// ## Errors
/// - 422 Unprocessable Entity: Token invalid, expired or not an email token
/// - 400 Bad Request: Token names no account
pub async fn confirmed_email<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    token: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let outcome = state.auth_service.confirm_email(&token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(outcome.message())))
}

/// Handler for POST /api/auth/request_email
///
/// Answers the same way whether or not the address is registered.
pub async fn request_email<U, C, M, S, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, M, S, R>>,
    body: web::Json<RequestEmail>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    body.validate()?;
    let outcome = state
        .auth_service
        .request_confirmation_email(&body.email, &state.base_url(&req))
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(outcome.message())))
}
