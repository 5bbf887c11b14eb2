//! End-to-end scenarios for the forgot/reset password flow.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use chrono::Duration;
use serde_json::json;

use accounts::domain::Role;
use accounts::test_support::TestBackend;

use support::{MEMBER_EMAIL, MEMBER_PASSWORD, login, send};

const NEW_PASSWORD: &str = "Recovered123!@#";

async fn member_backend() -> TestBackend {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    backend
}

#[actix_web::test]
async fn forgot_password_answers_the_same_for_unknown_accounts() {
    let backend = member_backend().await;
    let app = test::init_service(backend.app()).await;

    let known = send(
        &app,
        Method::POST,
        "/api/v1/forgot-password",
        None,
        Some(json!({ "email": MEMBER_EMAIL })),
    )
    .await;
    let unknown = send(
        &app,
        Method::POST,
        "/api/v1/forgot-password",
        None,
        Some(json!({ "email": "ghost@example.com" })),
    )
    .await;

    assert_eq!(known.status, StatusCode::ACCEPTED);
    assert_eq!(unknown.status, StatusCode::ACCEPTED);
    assert_eq!(known.body, unknown.body);
    assert_eq!(backend.notifier.sent_count(), 1);
}

#[actix_web::test]
async fn forgot_password_rejects_malformed_email() {
    let backend = member_backend().await;
    let app = test::init_service(backend.app()).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/forgot-password",
        None,
        Some(json!({ "email": "not-an-email" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.invalid_fields(), vec!["email"]);
    assert_eq!(backend.notifier.sent_count(), 0);
}

#[actix_web::test]
async fn issued_token_resets_the_password_once() {
    let backend = member_backend().await;
    let app = test::init_service(backend.app()).await;
    send(
        &app,
        Method::POST,
        "/api/v1/forgot-password",
        None,
        Some(json!({ "email": MEMBER_EMAIL })),
    )
    .await;
    let token = backend
        .notifier
        .last_token_for(MEMBER_EMAIL)
        .expect("token delivered");
    let reset = json!({
        "token": token,
        "email": MEMBER_EMAIL,
        "password": NEW_PASSWORD,
        "passwordConfirmation": NEW_PASSWORD
    });

    let first = send(
        &app,
        Method::POST,
        "/api/v1/reset-password",
        None,
        Some(reset.clone()),
    )
    .await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    login(&app, MEMBER_EMAIL, NEW_PASSWORD).await;

    let replay = send(&app, Method::POST, "/api/v1/reset-password", None, Some(reset)).await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(replay.invalid_fields(), vec!["email"]);
}

#[actix_web::test]
async fn expired_or_superseded_tokens_are_invalid() {
    let backend = member_backend().await;
    let app = test::init_service(backend.app()).await;
    let request_link = || {
        send(
            &app,
            Method::POST,
            "/api/v1/forgot-password",
            None,
            Some(json!({ "email": MEMBER_EMAIL })),
        )
    };

    request_link().await;
    let superseded = backend.notifier.last_token_for(MEMBER_EMAIL).expect("first");
    request_link().await;
    let current = backend.notifier.last_token_for(MEMBER_EMAIL).expect("second");
    backend.clock.advance(Duration::minutes(61));

    for token in [superseded, current] {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/reset-password",
            None,
            Some(json!({
                "token": token,
                "email": MEMBER_EMAIL,
                "password": NEW_PASSWORD,
                "passwordConfirmation": NEW_PASSWORD
            })),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["details"]["fields"]["email"][0],
            "This password reset token is invalid."
        );
    }
    login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;
}

#[actix_web::test]
async fn reset_validates_every_field() {
    let backend = member_backend().await;
    let app = test::init_service(backend.app()).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/reset-password",
        None,
        Some(json!({
            "email": "bad",
            "password": "weak",
            "passwordConfirmation": "other"
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let fields = response.invalid_fields();
    for field in ["email", "password", "token"] {
        assert!(fields.iter().any(|name| name == field), "{field} missing");
    }
}
