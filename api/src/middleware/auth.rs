//! Bearer-token authentication for protected endpoints.
//!
//! Handlers that need the caller take a [`CurrentUser`] argument. The
//! extractor reads `Authorization: Bearer <token>` and resolves it through
//! the session resolver registered as app data; any failure short-circuits
//! the request with 401.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures_util::future::{BoxFuture, LocalBoxFuture};
use std::future::{ready, Ready};

use cb_core::domain::entities::user::User;
use cb_core::errors::DomainError;
use cb_core::repositories::UserRepository;
use cb_core::services::session::SessionResolver;

use crate::handlers::ApiError;

/// Object-safe view of a [`SessionResolver`], so extractors need not know
/// the repository type
pub trait SessionResolverWrapper: Send + Sync {
    fn resolve_session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, DomainError>>;
}

impl<U: UserRepository + 'static> SessionResolverWrapper for SessionResolver<U> {
    fn resolve_session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, DomainError>> {
        Box::pin(self.resolve(token))
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = extract_bearer_token(req);
        let resolver = req
            .app_data::<web::Data<dyn SessionResolverWrapper>>()
            .cloned();

        Box::pin(async move {
            let token = token.ok_or(ApiError::Domain(DomainError::Unauthorized))?;
            let resolver = resolver.ok_or_else(|| {
                log::error!("Session resolver is not registered");
                ApiError::Domain(DomainError::Internal {
                    message: "session resolver missing".to_string(),
                })
            })?;

            let user = resolver.resolve_session(&token).await?;
            Ok(CurrentUser(user))
        })
    }
}

/// Raw bearer token, for endpoints that verify it themselves (refresh)
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequest for BearerToken {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            extract_bearer_token(req)
                .map(BearerToken)
                .ok_or(ApiError::Domain(DomainError::Unauthorized)),
        )
    }
}

/// Extracts the token from an `Authorization: Bearer` header
fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}
