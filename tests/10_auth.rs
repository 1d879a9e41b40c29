mod common;

use axum::http::StatusCode;
use serde_json::json;

use alumni_api::models::Role;
use common::{test_app, TEST_PASSWORD};

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["database"], json!("up"));
}

#[tokio::test]
async fn register_then_login() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": "budi",
                "email": "budi@example.com",
                "password": "rahasia-besar",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], json!("budi"));
    // role defaults to user and no password material leaks
    assert_eq!(body["data"]["role"], json!("user"));
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "budi", "password": "rahasia-besar"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["data"]["user"]["username"], json!("budi"));
}

#[tokio::test]
async fn login_accepts_email_as_identifier() {
    let app = test_app();
    app.seed_user("siti", Role::User).await;

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "siti@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app();
    app.seed_user("siti", Role::User).await;

    let (wrong_password, body_a) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "siti", "password": "not-the-password"}),
        )
        .await;
    let (unknown_user, body_b) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "nobody", "password": TEST_PASSWORD}),
        )
        .await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["message"], body_b["message"]);
}

#[tokio::test]
async fn register_validation() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"username": "x", "email": "x@example.com", "password": "12345"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({"username": "", "email": "x@example.com", "password": "123456"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let app = test_app();
    app.seed_user("budi", Role::User).await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({"username": "budi", "email": "other@example.com", "password": "123456"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({"username": "budi2", "email": "budi@example.com", "password": "123456"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_can_create_admin() {
    let app = test_app();
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "username": "kepala",
                "email": "kepala@example.com",
                "password": "123456",
                "role": "admin",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], json!("admin"));
}

#[tokio::test]
async fn profile_requires_a_valid_token() {
    let app = test_app();

    let (status, body) = app.get("/api/auth/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Access token required"));

    let (status, body) = app.get("/api/auth/profile", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid or expired token"));

    let (user, token) = app.seed_user("siti", Role::User).await;
    let (status, body) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], json!(user.id));
    assert_eq!(body["data"]["username"], json!("siti"));
}

#[tokio::test]
async fn validate_echoes_token_identity() {
    let app = test_app();
    let (user, token) = app.seed_user("siti", Role::Admin).await;

    let (status, body) = app.get("/api/auth/validate", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], json!(user.id));
    assert_eq!(body["data"]["role"], json!("admin"));
}

#[tokio::test]
async fn logout_is_stateless() {
    let app = test_app();
    let (_, token) = app.seed_user("siti", Role::User).await;

    let (status, _) = app.request("POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // token stays valid until it expires; logout is a client-side contract
    let (status, _) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}
