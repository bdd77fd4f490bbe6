//! Application state and factory
//!
//! This module holds the services shared by every worker and builds the
//! Actix-web application around them.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse};

use cb_core::repositories::{ContactRepository, UserRepository};
use cb_core::services::{
    AuthService, AvatarStorage, BcryptPasswordHasher, ConfirmationMailer, ContactService,
    RateLimiterTrait, UserCache,
};
use cb_shared::config::CorsConfig;
use cb_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::{json_error_handler, path_error_handler, query_error_handler};
use crate::middleware::{create_cors, ResponseTime, SessionResolverWrapper};
use crate::routes;

/// Services shared by all handlers
pub struct AppState<U, C, M, S, R>
where
    U: UserRepository,
    C: ContactRepository,
    M: ConfirmationMailer,
    S: AvatarStorage,
    R: RateLimiterTrait,
{
    pub auth_service: Arc<AuthService<U, BcryptPasswordHasher, M, S>>,
    pub contact_service: Arc<ContactService<C, R>>,
    pub user_repository: Arc<U>,
    pub user_cache: Arc<dyn UserCache>,
    /// Externally visible base URL; derived from the request when unset
    pub public_url: Option<String>,
    /// Upper bound on an avatar upload body
    pub max_avatar_bytes: usize,
}

impl<U, C, M, S, R> AppState<U, C, M, S, R>
where
    U: UserRepository,
    C: ContactRepository,
    M: ConfirmationMailer,
    S: AvatarStorage,
    R: RateLimiterTrait,
{
    /// Base URL placed in confirmation links
    pub fn base_url(&self, req: &HttpRequest) -> String {
        match &self.public_url {
            Some(url) => url.clone(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, C, M, S, R>(
    app_state: web::Data<AppState<U, C, M, S, R>>,
    session_resolver: web::Data<dyn SessionResolverWrapper>,
    cors_config: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    C: ContactRepository + 'static,
    M: ConfirmationMailer,
    S: AvatarStorage + 'static,
    R: RateLimiterTrait + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(session_resolver)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        // Order matters: timing sees the full handling time including CORS
        .wrap(create_cors(cors_config))
        .wrap(Logger::default())
        .wrap(ResponseTime)
        .service(
            web::scope("/api")
                .configure(routes::health::configure::<U, C, M, S, R>)
                .configure(routes::auth::configure::<U, C, M, S, R>)
                .configure(routes::users::configure::<U, C, M, S, R>)
                .configure(routes::contacts::configure::<U, C, M, S, R>),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, "Not found")
        .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
