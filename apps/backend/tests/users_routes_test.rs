mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_response;
use backend_test_support::unique_helpers::unique_email;
use common::{access_cookie, init_app, TestHarness};
use serde_json::{json, Value};
use sharevites::{Role, UserDirectory};

#[actix_web::test]
async fn create_user_defaults_to_user_role() {
    let harness = TestHarness::new();
    let app = init_app(harness.state.clone()).await;
    let email = unique_email("new");

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"email": email, "name": "New", "photoURL": "https://p/n.png", "role": "admin"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["role"], "user");
    assert_eq!(body["photo_url"], "https://p/n.png");

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"email": email}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_response(
        resp,
        StatusCode::CONFLICT,
        "USER_EXISTS",
        "A user with this email already exists",
    )
    .await;
}

#[actix_web::test]
async fn put_users_upserts_with_conditional_defaults() {
    let harness = TestHarness::new();
    let app = init_app(harness.state.clone()).await;
    let token = harness.token_for("a@x.com");

    let req = test::TestRequest::put()
        .uri("/users")
        .cookie(access_cookie(&token))
        .set_json(json!({"name": "Ada", "photoURL": "https://p/1.png", "provider": "google"}))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["created"], true);
    assert_eq!(first["user"]["role"], "user");
    let created_at = first["user"]["created_at"].clone();

    harness.clock.advance(Duration::from_secs(600));

    let req = test::TestRequest::put()
        .uri("/users")
        .cookie(access_cookie(&token))
        .set_json(json!({"name": "Changed", "photoURL": "https://p/2.png"}))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["created"], false);
    assert_eq!(second["user"]["created_at"], created_at);
    assert_eq!(second["user"]["name"], "Ada");
    assert_eq!(second["user"]["photo_url"], "https://p/2.png");
    assert_eq!(second["user"]["provider"], "google");
    assert_ne!(second["user"]["last_login_at"], first["user"]["last_login_at"]);
}

#[actix_web::test]
async fn put_users_requires_credential() {
    let app = init_app(TestHarness::new().state).await;

    let req = test::TestRequest::put()
        .uri("/users")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn get_user_by_email() {
    let harness = TestHarness::new();
    harness.seed("b@x.com", Role::User);
    let app = init_app(harness.state.clone()).await;
    let token = harness.token_for("a@x.com");

    let req = test::TestRequest::get()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["email"], "b@x.com");

    let req = test::TestRequest::get()
        .uri("/users/nobody@x.com")
        .cookie(access_cookie(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_response(resp, StatusCode::NOT_FOUND, "USER_NOT_FOUND", "user not found!").await;
}

#[actix_web::test]
async fn patch_only_own_record_unless_admin() {
    let harness = TestHarness::new();
    harness.seed("a@x.com", Role::User);
    harness.seed("b@x.com", Role::User);
    harness.seed("root@x.com", Role::Admin);
    let app = init_app(harness.state.clone()).await;

    let req = test::TestRequest::patch()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&harness.token_for("a@x.com")))
        .set_json(json!({"name": "Mallory"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri("/users/a@x.com")
        .cookie(access_cookie(&harness.token_for("a@x.com")))
        .set_json(json!({"name": "Ann"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Ann");

    let req = test::TestRequest::patch()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&harness.token_for("root@x.com")))
        .set_json(json!({"photoURL": "https://p/b.png"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["photo_url"], "https://p/b.png");
}

#[actix_web::test]
async fn admin_deletes_user() {
    let harness = TestHarness::new();
    harness.seed("root@x.com", Role::Admin);
    harness.seed("b@x.com", Role::User);
    let app = init_app(harness.state.clone()).await;
    let token = harness.token_for("root@x.com");

    let req = test::TestRequest::delete()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"deleted": 1}));

    let req = test::TestRequest::delete()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"deleted": 0}));
}

#[actix_web::test]
async fn non_admin_cannot_delete() {
    let harness = TestHarness::new();
    harness.seed("a@x.com", Role::User);
    harness.seed("b@x.com", Role::User);
    let app = init_app(harness.state.clone()).await;

    let req = test::TestRequest::delete()
        .uri("/users/b@x.com")
        .cookie(access_cookie(&harness.token_for("a@x.com")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_response(
        resp,
        StatusCode::FORBIDDEN,
        "INSUFFICIENT_ROLE",
        "Forbidden Access",
    )
    .await;
    assert!(harness
        .users
        .list_users()
        .await
        .unwrap()
        .iter()
        .any(|u| u.email == "b@x.com"));
}
