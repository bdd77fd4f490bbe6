//! Authentication route handlers
//!
//! - Signup and email confirmation
//! - Login, token refresh and logout

pub mod confirm;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod signup;

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
        web::scope("/auth")
            .route("/signup", web::post().to(signup::signup::<U, C, M, S, R>))
            .route("/login", web::post().to(login::login::<U, C, M, S, R>))
            .route(
                "/refresh_token",
                web::get().to(refresh::refresh_token::<U, C, M, S, R>),
            )
            .route(
                "/confirmed_email/{token}",
                web::get().to(confirm::confirmed_email::<U, C, M, S, R>),
            )
            .route(
                "/request_email",
                web::post().to(confirm::request_email::<U, C, M, S, R>),
            )
            .route("/logout", web::post().to(logout::logout::<U, C, M, S, R>)),
    );
}
