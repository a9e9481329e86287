mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use blog_content_api::middleware::auth::TokenIssuer;
use blog_content_api::user::model::Role;
use common::{TestContext, bearer, json_body};

#[actix_web::test]
async fn registration_creates_a_standard_user() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "new_writer", "password": "Secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["data"]["username"], "new_writer");
    assert_eq!(body["data"]["role"], "standard");
    assert!(body["data"].get("password").is_none());
}

#[actix_web::test]
async fn registration_rejects_duplicates_and_weak_passwords() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "taken", "password": "Secret123" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "taken", "password": "Secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["error"], "CONFLICT_ERROR");

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "other", "password": "short" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "no spaces", "password": "Secret123" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_token_carries_the_user_role() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&admin))
        .set_json(json!({ "title": "Board", "body": "" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/u/registration")
        .set_json(json!({ "username": "commenter", "password": "Secret123" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/u/login")
        .set_json(json!({ "username": "commenter", "password": "Secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = json_body(resp).await["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/posts/Board/comments")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "hi" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Mine", "body": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);
    ctx.standard().await;

    for (username, password) in [("reader", "Wrong123"), ("nobody", "Passw0rd")] {
        let req = test::TestRequest::post()
            .uri("/u/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["message"], "Unauthenticated: Invalid credentials");
    }
}

#[actix_web::test]
async fn expired_and_foreign_tokens_are_unauthenticated() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);
    let id = ObjectId::new();

    let expired = TokenIssuer::new(&ctx.config.jwt_secret, Duration::hours(-1))
        .issue(&id, Role::Admin)
        .unwrap();
    let foreign = TokenIssuer::new("some-other-secret", Duration::hours(1))
        .issue(&id, Role::Admin)
        .unwrap();

    for token in [expired, foreign] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Nope", "body": "" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(ctx.memory.post_count().await, 0);
}
