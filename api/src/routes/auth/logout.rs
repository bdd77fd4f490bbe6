use actix_web::{web, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};
use cb_shared::types::MessageResponse;

use crate::app::AppState;
use crate::handlers::ApiError;
use crate::middleware::CurrentUser;

/// Handler for POST /api/auth/logout
///
/// Revokes the caller's refresh token. Access tokens already issued stay
/// valid until they expire.
pub async fn logout<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    state.auth_service.logout(&user).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")))
}
