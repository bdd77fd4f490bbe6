//! Shared fixture for the HTTP tests
//!
//! Builds the application over in-memory collaborators and a manual clock
//! pinned to 2024-05-01.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};

use cb_api::app::AppState;
use cb_api::middleware::SessionResolverWrapper;
use cb_core::mock::{
    InMemoryCacheBackend, ManualClock, MockAvatarStorage, MockContactRepository,
    MockRateLimiter, MockUserRepository, RecordingMailer,
};
use cb_core::services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, Clock, ContactService,
    ContactServiceConfig, KeyValueUserCache, SessionResolver, TokenService, TokenServiceConfig,
    UserCache, UserCacheConfig,
};

pub type TestState = AppState<
    MockUserRepository,
    MockContactRepository,
    RecordingMailer,
    MockAvatarStorage,
    MockRateLimiter,
>;

pub const PUBLIC_URL: &str = "http://contacts.test";

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub resolver: web::Data<dyn SessionResolverWrapper>,
    pub users: Arc<MockUserRepository>,
    pub contacts: Arc<MockContactRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub storage: Arc<MockAvatarStorage>,
    pub limiter: Arc<MockRateLimiter>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_storage(MockAvatarStorage::default())
    }

    pub fn with_storage(storage: MockAvatarStorage) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let shared_clock: Arc<dyn Clock> = clock.clone();

        let users = Arc::new(MockUserRepository::new());
        let contacts = Arc::new(MockContactRepository::new());
        let mailer = Arc::new(RecordingMailer::new());
        let storage = Arc::new(storage);
        let limiter = Arc::new(MockRateLimiter::new());
        let tokens = Arc::new(
            TokenService::new(TokenServiceConfig::default(), shared_clock.clone()).unwrap(),
        );
        let cache: Arc<dyn UserCache> = Arc::new(KeyValueUserCache::new(
            Arc::new(InMemoryCacheBackend::new(shared_clock.clone())),
            UserCacheConfig::default(),
        ));

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            Arc::new(BcryptPasswordHasher::new(4)),
            tokens.clone(),
            cache.clone(),
            mailer.clone(),
            storage.clone(),
            AuthServiceConfig::default(),
        ));
        let contact_service = Arc::new(ContactService::new(
            contacts.clone(),
            limiter.clone(),
            shared_clock,
            ContactServiceConfig::default(),
        ));

        let resolver: Arc<dyn SessionResolverWrapper> =
            Arc::new(SessionResolver::new(tokens.clone(), cache.clone(), users.clone()));

        let state = web::Data::new(AppState {
            auth_service,
            contact_service,
            user_repository: users.clone(),
            user_cache: cache,
            public_url: Some(PUBLIC_URL.to_string()),
            max_avatar_bytes: 1024,
        });

        Self {
            state,
            resolver: web::Data::from(resolver),
            users,
            contacts,
            mailer,
            storage,
            limiter,
            tokens,
            clock,
        }
    }
}

/// Initialise the application of a [`TestContext`] as a test service
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(cb_api::app::create_app(
            $ctx.state.clone(),
            $ctx.resolver.clone(),
            &cb_shared::config::CorsConfig::default(),
        ))
        .await
    };
}

/// Sign up, confirm and log in; evaluates to the token response JSON
#[macro_export]
macro_rules! confirmed_login {
    ($app:expr, $ctx:expr, $email:expr) => {{
        use cb_core::repositories::UserRepository as _;

        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(serde_json::json!({
                "username": "alice",
                "email": $email,
                "password": "pw123",
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        $ctx.users.set_confirmed($email).await.unwrap();

        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/login")
            .set_form([("username", $email), ("password", "pw123")])
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        body
    }};
}

pub fn bearer(token: &serde_json::Value) -> (String, String) {
    (
        "Authorization".to_string(),
        format!("Bearer {}", token.as_str().unwrap_or_default()),
    )
}

/// Single-part `multipart/form-data` body; returns the content-type header
/// and the encoded body
pub fn multipart_form(name: &str, content_type: &str, data: &[u8]) -> ((String, String), Vec<u8>) {
    let boundary = "contact-book-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (
        (
            "Content-Type".to_string(),
            format!("multipart/form-data; boundary={boundary}"),
        ),
        body,
    )
}
