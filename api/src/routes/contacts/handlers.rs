use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

use crate::app::AppState;
use crate::dto::contact::{
    to_responses, ContactRequest, ContactResponse, FavoriteRequest, ListQuery,
};
use crate::handlers::ApiError;
use crate::middleware::CurrentUser;

/// Handler for GET /api/contacts
///
/// Query: `skip` (default 0), `limit` (10..=100, default 10), `favorite`.
pub async fn list_contacts<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let contacts = state
        .contact_service
        .list(&user, query.favorite, query.page())
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(contacts)))
}

/// Handler for GET /api/contacts/all; admins and moderators only
pub async fn list_all_contacts<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let contacts = state
        .contact_service
        .list_all(&user, query.favorite, query.page())
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(contacts)))
}

pub async fn read_contact<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    contact_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let contact = state
        .contact_service
        .get(&user, contact_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::from(contact)))
}

/// Handler for POST /api/contacts
///
/// ## Errors
/// - 409 Conflict: The caller already has a contact with this email
/// - 422 Unprocessable Entity: Field validation failed
/// - 429 Too Many Requests: Creation budget exhausted, see `Retry-After`
pub async fn create_contact<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    body: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    body.validate()?;
    let contact = state
        .contact_service
        .create(&user, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ContactResponse::from(contact)))
}

pub async fn update_contact<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    contact_id: web::Path<Uuid>,
    body: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    body.validate()?;
    let contact = state
        .contact_service
        .update(&user, contact_id.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::from(contact)))
}

/// Handler for PATCH /api/contacts/{contact_id}/favorite; admins and
/// moderators only
pub async fn favorite_contact<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    contact_id: web::Path<Uuid>,
    body: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let contact = state
        .contact_service
        .set_favorite(&user, contact_id.into_inner(), body.favorite)
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::from(contact)))
}

/// Handler for DELETE /api/contacts/{contact_id}; 204 on success
pub async fn delete_contact<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    contact_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let removed = state
        .contact_service
        .delete(&user, contact_id.into_inner())
        .await?;
    log::info!("Contact {} removed by {}", removed.id, user.id);
    Ok(HttpResponse::NoContent().finish())
}
