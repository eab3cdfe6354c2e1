#![allow(clippy::unwrap_used, clippy::panic, unreachable_pub, missing_debug_implementations)]
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_first_failing_rule_is_reported() {
    let app = common::TestApp::spawn().await;

    let resp = app.post_user(&json!({"email": "bad", "fullName": "Al", "password": "short"})).await;
    let body = common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect email input").await;
    assert_eq!(body["details"], "email must have 5-256 chars and contain @");

    let resp = app.post_user(&json!({"email": "a@b.com", "fullName": "Al", "password": "short"})).await;
    common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect fullName input").await;

    let resp = app.post_user(&json!({"email": "a@b.com", "fullName": "Alice", "password": "short"})).await;
    common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect password input").await;

    assert!(app.list_users().await.is_empty());
}

#[tokio::test]
async fn test_password_charset_is_enforced() {
    let app = common::TestApp::spawn().await;

    let too_long = "x".repeat(257);
    for password in ["with space1", "tab\tinside", "naïve-pass", too_long.as_str()] {
        let resp = app.post_user(&common::user_body("a@b.com", "Alice", password)).await;
        common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect password input").await;
    }

    app.create_user("a@b.com", "Alice", "!\"#$%&'()*+,-./~").await;
}

#[tokio::test]
async fn test_missing_fields_fail_validation() {
    let app = common::TestApp::spawn().await;

    let resp = app.post_user(&json!({"email": "a@b.com", "password": "Secret1!"})).await;

    common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect fullName input").await;
}

#[tokio::test]
async fn test_update_is_validated() {
    let app = common::TestApp::spawn().await;
    app.create_user("a@b.com", "Alice", "Secret1!").await;

    let resp = app.put_user(1, &common::user_body("no-at-sign", "Alice", "Secret1!")).await;
    common::assert_error(resp, StatusCode::UNPROCESSABLE_ENTITY, "incorrect email input").await;

    let stored: serde_json::Value = app.get_user(1).await.json().await.unwrap();
    assert_eq!(stored["email"], "a@b.com");
}

#[tokio::test]
async fn test_malformed_body_is_unsupported_media_type() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(app.users_url())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    common::assert_error(resp, StatusCode::UNSUPPORTED_MEDIA_TYPE, "malformed request body").await;

    let resp = app.post_user(&json!({"email": 42, "full-name": "Alice", "password": "Secret1!"})).await;
    common::assert_error(resp, StatusCode::UNSUPPORTED_MEDIA_TYPE, "malformed request body").await;

    let resp = app.client.post(app.users_url()).body("email=a@b.com").send().await.unwrap();
    common::assert_error(resp, StatusCode::UNSUPPORTED_MEDIA_TYPE, "malformed request body").await;

    app.create_user("a@b.com", "Alice", "Secret1!").await;
    let resp = app
        .client
        .put(app.user_url(1))
        .header("content-type", "application/json")
        .body("\"just a string\"")
        .send()
        .await
        .unwrap();
    common::assert_error(resp, StatusCode::UNSUPPORTED_MEDIA_TYPE, "malformed request body").await;
}
