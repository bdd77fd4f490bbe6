//! Contact book endpoints over HTTP

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{bearer, TestContext};

fn contact(first: &str, email: &str, birthday: Option<&str>) -> Value {
    json!({
        "first_name": first,
        "last_name": "Lee",
        "email": email,
        "phone": "+380501112233",
        "birthday": birthday,
        "comments": null,
    })
}

/// POST a contact with a fresh rate-limit window; evaluates to the response
macro_rules! create {
    ($app:expr, $ctx:expr, $tokens:expr, $body:expr) => {{
        $ctx.limiter.reset().await;
        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .insert_header(bearer(&$tokens["access_token"]))
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_create_and_read_contact() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let resp = create!(app, ctx, tokens, contact("Ann", "Ann@X.com", Some("1990-05-03")));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["email"], "ann@x.com");
    assert_eq!(created["favorite"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/contacts/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    let read: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(read["id"], created["id"]);
    assert_eq!(read["user_id"], created["user_id"]);
}

#[actix_web::test]
async fn test_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let first = create!(app, ctx, tokens, contact("Ann", "ann@x.com", None));
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = create!(app, ctx, tokens, contact("Other", "ANN@x.com", None));
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["message"], "Email is exist!");
}

#[actix_web::test]
async fn test_invalid_contact_is_unprocessable() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let resp = create!(app, ctx, tokens, contact("", "not-an-email", None));
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ctx.contacts.len().await, 0);
}

#[actix_web::test]
async fn test_creation_budget_is_enforced() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    for (i, expected) in [StatusCode::CREATED, StatusCode::CREATED, StatusCode::TOO_MANY_REQUESTS]
        .into_iter()
        .enumerate()
    {
        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .insert_header(bearer(&tokens["access_token"]))
            .set_json(contact("Ann", &format!("ann{}@x.com", i), None))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::TOO_MANY_REQUESTS {
            assert_eq!(resp.headers().get("retry-after").unwrap(), "5");
        }
    }
    assert_eq!(ctx.contacts.len().await, 2);
}

#[actix_web::test]
async fn test_limiter_outage_does_not_block_creation() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");
    ctx.limiter.set_failure(true);

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .insert_header(bearer(&tokens["access_token"]))
            .set_json(contact("Ann", &format!("ann{}@x.com", i), None))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }
}

#[actix_web::test]
async fn test_contacts_are_private_to_their_owner() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let alice = confirmed_login!(app, ctx, "a@x.com");
    let bob = confirmed_login!(app, ctx, "b@x.com");

    let resp = create!(app, ctx, alice, contact("Ann", "ann@x.com", None));
    let created: Value = test::read_body_json(resp).await;
    let uri = format!("/api/contacts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&bob["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&bob["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(bearer(&bob["access_token"]))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_update_then_delete() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let resp = create!(app, ctx, tokens, contact("Ann", "ann@x.com", None));
    let created: Value = test::read_body_json(resp).await;
    let uri = format!("/api/contacts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&tokens["access_token"]))
        .set_json(contact("Anna", "anna@x.com", Some("1991-01-02")))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["first_name"], "Anna");
    assert_eq!(updated["email"], "anna@x.com");
    assert_eq!(updated["birthday"], "1991-01-02");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_id_reads_as_missing() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::get()
        .uri("/api/contacts/not-a-uuid")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_listing_limit_out_of_range() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    let req = test::TestRequest::get()
        .uri("/api/contacts?limit=500")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn test_all_contacts_is_for_curators() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    // The first account is bootstrapped as admin
    let admin = confirmed_login!(app, ctx, "a@x.com");
    let user = confirmed_login!(app, ctx, "b@x.com");

    create!(app, ctx, admin, contact("Ann", "ann@x.com", None));
    create!(app, ctx, user, contact("Bob", "bob@x.com", None));

    let req = test::TestRequest::get()
        .uri("/api/contacts/all")
        .insert_header(bearer(&user["access_token"]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/contacts/all")
        .insert_header(bearer(&admin["access_token"]))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_favorite_flag_is_curated() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let admin = confirmed_login!(app, ctx, "a@x.com");
    let user = confirmed_login!(app, ctx, "b@x.com");

    let resp = create!(app, ctx, user, contact("Bob", "bob@x.com", None));
    let created: Value = test::read_body_json(resp).await;
    let req = test::TestRequest::patch()
        .uri(&format!("/api/contacts/{}/favorite", created["id"].as_str().unwrap()))
        .insert_header(bearer(&user["access_token"]))
        .set_json(json!({"favorite": true}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let resp = create!(app, ctx, admin, contact("Ann", "ann@x.com", None));
    let created: Value = test::read_body_json(resp).await;
    let req = test::TestRequest::patch()
        .uri(&format!("/api/contacts/{}/favorite", created["id"].as_str().unwrap()))
        .insert_header(bearer(&admin["access_token"]))
        .set_json(json!({"favorite": true}))
        .to_request();
    let favored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(favored["favorite"], true);

    let req = test::TestRequest::get()
        .uri("/api/contacts?favorite=true")
        .insert_header(bearer(&admin["access_token"]))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_search_by_fragment() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");
    create!(app, ctx, tokens, contact("Ann", "ann@x.com", None));
    create!(app, ctx, tokens, contact("Bob", "bob@y.com", None));

    let req = test::TestRequest::get()
        .uri("/api/contacts/search_by/aNN")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["first_name"], "Ann");

    let req = test::TestRequest::get()
        .uri("/api/contacts/search_by/zed")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Contact Not Found");
}

#[actix_web::test]
async fn test_upcoming_birthdays_are_ordered() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tokens = confirmed_login!(app, ctx, "a@x.com");

    // Today is 2024-05-01
    create!(app, ctx, tokens, contact("Later", "later@x.com", Some("1985-05-06")));
    create!(app, ctx, tokens, contact("Soon", "soon@x.com", Some("1990-05-02")));
    create!(app, ctx, tokens, contact("Far", "far@x.com", Some("1990-06-20")));
    create!(app, ctx, tokens, contact("None", "none@x.com", None));

    let req = test::TestRequest::get()
        .uri("/api/contacts/search/birthdays?days=7")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Soon", "Later"]);

    let req = test::TestRequest::get()
        .uri("/api/contacts/search/birthdays?days=31")
        .insert_header(bearer(&tokens["access_token"]))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}
