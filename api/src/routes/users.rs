//! Endpoints about the calling account

use actix_multipart::Multipart;
use actix_web::{http::header, web, web::Bytes, HttpRequest, HttpResponse};
use futures_util::{Stream, StreamExt, TryStreamExt};

use cb_core::errors::ValidationError;
use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

use crate::app::AppState;
use crate::dto::auth::UserResponse;
use crate::handlers::ApiError;
use crate::middleware::CurrentUser;

/// Form part carrying the avatar image
const AVATAR_FIELD: &str = "file";

pub fn configure<U, C, M, S, R>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    cfg.service(
        web::scope("/users")
            .route("/me/", web::get().to(read_me))
            .route("/avatar", web::patch().to(update_avatar::<U, C, M, S, R>)),
    );
}

/// Handler for GET /api/users/me/
pub async fn read_me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(&*user))
}

/// Handler for PATCH /api/users/avatar
///
/// Accepts either a `multipart/form-data` form whose `file` part is the
/// image, or the raw image as the body with an `image/*` content type.
/// Images over the configured limit are refused with 413.
pub async fn update_avatar<U, C, M, S, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let limit = state.max_avatar_bytes;
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let image = if content_type.starts_with("multipart/form-data") {
        read_file_part(Multipart::new(req.headers(), payload), limit).await?
    } else if content_type.starts_with("image/") {
        read_limited(payload, limit).await?
    } else {
        return Err(ApiError::Domain(ValidationError::InvalidImage.into()));
    };

    let updated = state.auth_service.update_avatar(&user, image).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

/// Pull the image out of the form's `file` part; other parts are skipped
async fn read_file_part(mut multipart: Multipart, limit: usize) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.try_next().await.map_err(|e| {
        log::debug!("Failed to read multipart field: {}", e);
        ApiError::Malformed(format!("Invalid multipart data: {}", e))
    })? {
        if field.content_disposition().get_name() != Some(AVATAR_FIELD) {
            read_limited(field, limit).await?;
            continue;
        }

        let is_image = field
            .content_type()
            .map_or(false, |mime| mime.essence_str().starts_with("image/"));
        if !is_image {
            return Err(ApiError::Domain(ValidationError::InvalidImage.into()));
        }
        return read_limited(field, limit).await;
    }

    Err(ApiError::Malformed(format!("Missing '{}' part", AVATAR_FIELD)))
}

/// Collect a body stream, failing as soon as it grows past `limit`
async fn read_limited<B, E>(mut body: B, limit: usize) -> Result<Vec<u8>, ApiError>
where
    B: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut data = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ApiError::Malformed(format!("Failed to read upload: {}", e)))?;
        if data.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
