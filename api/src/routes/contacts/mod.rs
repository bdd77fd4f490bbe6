//! Contact book endpoints
//!
//! Literal paths are registered before `/{contact_id}` so they are not
//! captured as ids.

pub mod handlers;
pub mod search;

use actix_web::web;

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{AvatarStorage, ConfirmationMailer, RateLimiterTrait};

pub fn configure<U, C, M, S, R>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    cfg.service(
        web::scope("/contacts")
            .route("", web::get().to(handlers::list_contacts::<U, C, M, S, R>))
            .route("", web::post().to(handlers::create_contact::<U, C, M, S, R>))
            .route("/all", web::get().to(handlers::list_all_contacts::<U, C, M, S, R>))
            .route(
                "/search_by/{query}",
                web::get().to(search::search_contacts::<U, C, M, S, R>),
            )
            .route(
                "/search/birthdays",
                web::get().to(search::upcoming_birthdays::<U, C, M, S, R>),
            )
            .route(
                "/{contact_id}",
                web::get().to(handlers::read_contact::<U, C, M, S, R>),
            )
            .route(
                "/{contact_id}",
                web::put().to(handlers::update_contact::<U, C, M, S, R>),
            )
            .route(
                "/{contact_id}",
                web::delete().to(handlers::delete_contact::<U, C, M, S, R>),
            )
            .route(
                "/{contact_id}/favorite",
                web::patch().to(handlers::favorite_contact::<U, C, M, S, R>),
            ),
    );
}
