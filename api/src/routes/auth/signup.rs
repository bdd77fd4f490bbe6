use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait, SignupCommand};

use crate::app::AppState;
use crate::dto::auth::{SignupRequest, UserResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/auth/signup
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "a@x.com", "password": "pw123" }
/// ```
///
/// ## Success (201 Created)
/// The new account as a `UserResponse`. A confirmation mail is sent in the
/// background; login stays refused until the link is followed.
///
/// ## Errors
/// - 409 Conflict: Email already registered
/// - 422 Unprocessable Entity: Field validation failed
pub async fn signup<U, C, M, S, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, M, S, R>>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    body.validate()?;
    let body = body.into_inner();

    let command = SignupCommand::new(body.username, body.email, body.password);
    let user = state
        .auth_service
        .signup(command, &state.base_url(&req))
        .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}
