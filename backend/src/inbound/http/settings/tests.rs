//! Handler tests for account settings endpoints.

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use super::*;
use crate::domain::Role;
use crate::domain::test_fixtures::user_with_role;
use crate::inbound::http::test_utils::{MockPorts, api_test_app, session_cookie, sign_in};

#[actix_web::test]
async fn profile_returns_current_user_uncached() {
    let actor = user_with_role("ann@example.com", Role::User);
    let app = test::init_service(api_test_app(MockPorts::default().with_actor(&actor).into_state()))
        .await;
    let cookie = sign_in(&app, &actor).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/settings/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("Cache-Control")
            .and_then(|value| value.to_str().ok()),
        Some("private, no-store")
    );
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["email"], "ann@example.com");
}

#[actix_web::test]
async fn profile_update_returns_updated_user() {
    let actor = user_with_role("ann@example.com", Role::User);
    let mut updated = actor.clone();
    updated.email = "ann@new.example.com".to_owned();
    updated.email_verified_at = None;
    let mut ports = MockPorts::default().with_actor(&actor);
    ports
        .settings
        .expect_update_profile()
        .withf(|_, form| form.email.as_deref() == Some("ann@new.example.com"))
        .times(1)
        .returning(move |_, _| Ok(updated.clone()));
    let app = test::init_service(api_test_app(ports.into_state())).await;
    let cookie = sign_in(&app, &actor).await;

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/settings/profile")
            .cookie(cookie)
            .set_json(json!({"name": "ann", "email": "ann@new.example.com"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["email"], "ann@new.example.com");
    assert!(body["emailVerifiedAt"].is_null());
}

#[actix_web::test]
async fn password_change_maps_camel_case_fields() {
    let actor = user_with_role("ann@example.com", Role::User);
    let mut ports = MockPorts::default().with_actor(&actor);
    ports
        .settings
        .expect_change_password()
        .withf(|_, form| {
            form.current_password.as_deref() == Some("Old123!@#")
                && form.password.as_deref() == Some("New123!@#")
                && form.password_confirmation.as_deref() == Some("New123!@#")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let app = test::init_service(api_test_app(ports.into_state())).await;
    let cookie = sign_in(&app, &actor).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/settings/password")
            .cookie(cookie)
            .set_json(json!({
                "currentPassword": "Old123!@#",
                "password": "New123!@#",
                "passwordConfirmation": "New123!@#"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn account_deletion_purges_session() {
    let actor = user_with_role("ann@example.com", Role::User);
    let mut ports = MockPorts::default().with_actor(&actor);
    ports
        .settings
        .expect_delete_account()
        .times(1)
        .returning(|_, _| Ok(()));
    let app = test::init_service(api_test_app(ports.into_state())).await;
    let cookie = sign_in(&app, &actor).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/settings/profile")
            .cookie(cookie)
            .set_json(json!({"password": "Secret123!@#"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(session_cookie(&response).value().is_empty());
}

#[actix_web::test]
async fn wrong_password_keeps_session() {
    let actor = user_with_role("ann@example.com", Role::User);
    let mut ports = MockPorts::default().with_actor(&actor);
    ports.settings.expect_delete_account().returning(|_, _| {
        let mut errors = crate::domain::ValidationErrors::new();
        errors.add("password", "The password is incorrect.");
        Err(errors.into_error())
    });
    let app = test::init_service(api_test_app(ports.into_state())).await;
    let cookie = sign_in(&app, &actor).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/settings/profile")
            .cookie(cookie)
            .set_json(json!({"password": "nope"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["details"]["fields"]["password"][0],
        "The password is incorrect."
    );
}
