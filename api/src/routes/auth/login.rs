use actix_web::{web, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

use crate::app::AppState;
use crate::dto::auth::{LoginForm, TokenResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/auth/login
///
/// Takes an OAuth2-style password form (`username` is the email) and
/// answers with an access/refresh token pair.
///
/// ## Errors
/// - 401 Unauthorized: Unknown email, wrong password or unconfirmed email
pub async fn login<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let pair = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}
