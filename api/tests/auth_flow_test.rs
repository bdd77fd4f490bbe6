//! Signup, confirmation, login, refresh and logout over HTTP

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use cb_core::domain::entities::user::Role;

use common::{bearer, multipart_form, TestContext, PUBLIC_URL};

#[actix_web::test]
async fn test_signup_returns_public_profile() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"username": "alice", "email": "Alice@Example.com", "password": "pw123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["roles"], "admin");
    assert!(body["avatar"].as_str().unwrap().contains("gravatar"));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_signup_twice_conflicts() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let payload = json!({"username": "alice", "email": "a@x.com", "password": "pw123"});

    let first = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, second).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_signup_rejects_short_password() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"username": "alice", "email": "a@x.com", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_login_before_confirmation_is_refused() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"username": "alice", "email": "a@x.com", "password": "pw123"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_form([("username", "a@x.com"), ("password", "pw123")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("www-authenticate"));
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_email_look_alike() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    confirmed_login!(app, ctx, "a@x.com");

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_form([("username", "a@x.com"), ("password", "nope1")])
        .to_request();
    let wrong = test::call_service(&app, wrong).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong: Value = test::read_body_json(wrong).await;

    let unknown = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_form([("username", "b@x.com"), ("password", "pw123")])
        .to_request();
    let unknown = test::call_service(&app, unknown).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: Value = test::read_body_json(unknown).await;

    assert_eq!(wrong["error"], unknown["error"]);
    assert_eq!(wrong["message"], unknown["message"]);
}

#[actix_web::test]
async fn test_confirmation_link_confirms_once() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"username": "alice", "email": "a@x.com", "password": "pw123"}))
        .to_request();
    test::call_service(&app, req).await;

    let sent = ctx.mailer.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].base_url, PUBLIC_URL);
    let link = sent[0].confirmation_link();
    let path = link.trim_start_matches(PUBLIC_URL).to_string();

    let first = test::TestRequest::get().uri(&path).to_request();
    let first = test::call_service(&app, first).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = test::read_body_json(first).await;
    assert_eq!(first["message"], "Email confirmed");

    let again = test::TestRequest::get().uri(&path).to_request();
    let again: Value = test::call_and_read_body_json(&app, again).await;
    assert_eq!(again["message"], "Your email is already confirmed");

    assert!(ctx.users.snapshot("a@x.com").await.unwrap().confirmed);
}

#[actix_web::test]
async fn test_garbage_confirmation_token_is_unprocessable() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/auth/confirmed_email/not-a-token")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_request_email_does_not_reveal_accounts() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/request_email")
        .set_json(json!({"email": "nobody@x.com"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Check your email for confirmation.");
    assert!(ctx.mailer.sent().await.is_empty());
}

#[actix_web::test]
async fn test_refresh_token_is_single_use() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");
    assert_eq!(tokens["token_type"], "bearer");

    let req = test::TestRequest::get()
        .uri("/api/auth/refresh_token")
        .insert_header(bearer(&tokens["refresh_token"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated: Value = test::read_body_json(resp).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // Replaying the superseded token revokes the session entirely
    let replay = test::TestRequest::get()
        .uri("/api/auth/refresh_token")
        .insert_header(bearer(&tokens["refresh_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, replay).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let after = test::TestRequest::get()
        .uri("/api/auth/refresh_token")
        .insert_header(bearer(&rotated["refresh_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, after).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_access_token_cannot_refresh() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::get()
        .uri("/api/auth/refresh_token")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_logout_clears_refresh_token() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(ctx.users.snapshot("a@x.com").await.unwrap().refresh_token.is_none());

    let req = test::TestRequest::get()
        .uri("/api/auth/refresh_token")
        .insert_header(bearer(&tokens["refresh_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_read_me_requires_access_token() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let anonymous = test::TestRequest::get().uri("/api/users/me/").to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let wrong_purpose = test::TestRequest::get()
        .uri("/api/users/me/")
        .insert_header(bearer(&tokens["refresh_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong_purpose).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/users/me/")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["email"], "a@x.com");
    assert_eq!(me["roles"], Role::Admin.as_str());
}

#[actix_web::test]
async fn test_avatar_upload_replaces_avatar() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::patch()
        .uri("/api/users/avatar")
        .insert_header(bearer(&tokens["access_token"]))
        .insert_header(("Content-Type", "image/png"))
        .set_payload(vec![0x89, 0x50, 0x4e, 0x47])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let stored = ctx.users.snapshot("a@x.com").await.unwrap();
    assert_eq!(body["avatar"].as_str(), stored.avatar.as_deref());
    assert!(!stored.avatar.unwrap().contains("gravatar"));
    assert_eq!(ctx.storage.object_count().await, 1);
}

#[actix_web::test]
async fn test_avatar_upload_rejects_non_images() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::patch()
        .uri("/api/users/avatar")
        .insert_header(bearer(&tokens["access_token"]))
        .insert_header(("Content-Type", "text/plain"))
        .set_payload("hello")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn test_avatar_upload_from_form_file_part() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let (content_type, body) = multipart_form("file", "image/png", &[0x89, 0x50, 0x4e, 0x47]);
    let req = test::TestRequest::patch()
        .uri("/api/users/avatar")
        .insert_header(bearer(&tokens["access_token"]))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let stored = ctx.users.snapshot("a@x.com").await.unwrap();
    assert_eq!(body["avatar"].as_str(), stored.avatar.as_deref());
    assert_eq!(ctx.storage.object_count().await, 1);
}

#[actix_web::test]
async fn test_avatar_form_requires_image_file_part() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    for (name, part_type) in [("file", "text/plain"), ("photo", "image/png")] {
        let (content_type, body) = multipart_form(name, part_type, b"not used");
        let req = test::TestRequest::patch()
            .uri("/api/users/avatar")
            .insert_header(bearer(&tokens["access_token"]))
            .insert_header(content_type)
            .set_payload(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "part {} ({})",
            name,
            part_type
        );
    }
    assert_eq!(ctx.storage.object_count().await, 0);
}
