//! Cross-cutting behavior: timing header, health, unknown routes

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::Value;

use cb_api::middleware::timing::PERFORMANCE_HEADER;

use common::{bearer, multipart_form, TestContext};

#[actix_web::test]
async fn test_every_response_is_timed() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    for uri in ["/api/healthchecker", "/api/users/me/", "/nowhere"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let value = resp
            .headers()
            .get(PERFORMANCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(value.parse::<f64>().unwrap() >= 0.0, "{} -> {}", uri, value);
    }
}

#[actix_web::test]
async fn test_health_reports_store_and_cache() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/healthchecker").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Welcome to the contact book API!");
    assert_eq!(body["cache"], true);
}

#[actix_web::test]
async fn test_health_fails_when_store_is_down() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    ctx.users.set_failure(true);

    let req = test::TestRequest::get().uri("/api/healthchecker").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Error connecting to the database");
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_cached_session_survives_store_outage() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    // Contacts still work off the cached session even with the user store down
    ctx.users.set_failure(true);
    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_oversized_avatar_is_refused() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::patch()
        .uri("/api/users/avatar")
        .insert_header(bearer(&tokens["access_token"]))
        .insert_header(("Content-Type", "image/png"))
        .set_payload(vec![0u8; 4096])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::PAYLOAD_TOO_LARGE
    );
    assert_eq!(ctx.storage.object_count().await, 0);
}

#[actix_web::test]
async fn test_oversized_form_avatar_is_refused() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let (content_type, body) = multipart_form("file", "image/png", &[0u8; 4096]);
    let req = test::TestRequest::patch()
        .uri("/api/users/avatar")
        .insert_header(bearer(&tokens["access_token"]))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "PAYLOAD_TOO_LARGE");
    assert_eq!(ctx.storage.object_count().await, 0);
}
