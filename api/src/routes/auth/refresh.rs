use actix_web::{web, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

use crate::app::AppState;
use crate::dto::auth::TokenResponse;
use crate::handlers::ApiError;
use crate::middleware::BearerToken;

/// Handler for GET /api/auth/refresh_token
///
/// The refresh token travels as the bearer credential. It is single use:
/// presenting an already-rotated token revokes the session.
///
/// ## Errors
/// - 401 Unauthorized: Invalid, expired, wrong-purpose or superseded token
pub async fn refresh_token<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    token: BearerToken,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let pair = state.auth_service.refresh(&token.0).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}
