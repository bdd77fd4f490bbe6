use actix_web::{web, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

use crate::app::AppState;
use crate::dto::contact::{to_responses, BirthdayQuery};
use crate::handlers::ApiError;
use crate::middleware::CurrentUser;

/// Handler for GET /api/contacts/search_by/{query}
///
/// Case-insensitive match on first name, last name or email; 404 when
/// nothing matches.
pub async fn search_contacts<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    query: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    let contacts = state.contact_service.search(&user, &query).await?;
    Ok(HttpResponse::Ok().json(to_responses(contacts)))
}

/// Handler for GET /api/contacts/search/birthdays
///
/// Query: `days` (1..=30, default 7), `skip`, `limit` (1..=30, default 10).
/// Results are ordered by how soon the birthday comes.
pub async fn upcoming_birthdays<U, C, M, S, R>(
    state: web::Data<AppState<U, C, M, S, R>>,
    user: CurrentUser,
    query: web::Query<BirthdayQuery>,
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
        .upcoming_birthdays(&user, query.days, query.page())
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(contacts)))
}
