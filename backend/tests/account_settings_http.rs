//! End-to-end scenarios for login, password confirmation and self-service
//! account settings.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use accounts::domain::ports::UserRepository;
use accounts::domain::{PasswordRules, Role};
use accounts::test_support::TestBackend;

use support::{ADMIN_EMAIL, ADMIN_PASSWORD, MEMBER_EMAIL, MEMBER_PASSWORD, login, send};

#[actix_web::test]
async fn wrong_password_is_an_opaque_unauthorised() {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;

    for (email, password) in [
        (MEMBER_EMAIL, "Wrong123!@#"),
        ("nobody@example.com", MEMBER_PASSWORD),
    ] {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "invalid credentials");
        assert!(response.cookie.is_none());
    }
}

#[actix_web::test]
async fn blank_credentials_are_a_validation_error() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "email": "", "password": "" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.invalid_fields(), vec!["email", "password"]);
}

#[actix_web::test]
async fn profile_is_returned_without_caching() {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let response = send(
        &app,
        Method::GET,
        "/api/v1/settings/profile",
        Some(&cookie),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], MEMBER_EMAIL);
    assert_eq!(response.header("cache-control"), Some("private, no-store"));
}

#[actix_web::test]
async fn changing_email_clears_verification_but_renaming_does_not() {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let renamed = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/profile",
        Some(&cookie),
        Some(json!({ "name": "Renamed", "email": MEMBER_EMAIL })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert!(renamed.body["emailVerifiedAt"].is_string());

    let moved = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/profile",
        Some(&cookie),
        Some(json!({ "name": "Renamed", "email": "moved@example.com" })),
    )
    .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert!(moved.body["emailVerifiedAt"].is_null());
}

#[actix_web::test]
async fn profile_email_must_not_belong_to_someone_else() {
    let backend = TestBackend::new();
    backend
        .seed("Admin", ADMIN_EMAIL, Role::Admin, ADMIN_PASSWORD)
        .await;
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let response = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/profile",
        Some(&cookie),
        Some(json!({ "name": "Member", "email": ADMIN_EMAIL })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.invalid_fields(), vec!["email"]);
}

#[actix_web::test]
async fn password_change_requires_current_password_and_confirmation() {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let rejected = send(
        &app,
        Method::PUT,
        "/api/v1/settings/password",
        Some(&cookie),
        Some(json!({
            "currentPassword": "Wrong123!@#",
            "password": "Fresh123!@#",
            "passwordConfirmation": "Different123!@#"
        })),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        rejected.invalid_fields(),
        vec!["currentPassword", "passwordConfirmation"]
    );

    let accepted = send(
        &app,
        Method::PUT,
        "/api/v1/settings/password",
        Some(&cookie),
        Some(json!({
            "currentPassword": MEMBER_PASSWORD,
            "password": "Fresh123!@#",
            "passwordConfirmation": "Fresh123!@#"
        })),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::NO_CONTENT);
    login(&app, MEMBER_EMAIL, "Fresh123!@#").await;
}

#[actix_web::test]
async fn configured_rules_apply_to_new_passwords() {
    let backend = TestBackend::with_rules(PasswordRules {
        min_length: 20,
        ..PasswordRules::default()
    });
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/settings/password",
        Some(&cookie),
        Some(json!({
            "currentPassword": MEMBER_PASSWORD,
            "password": "Short123!@#",
            "passwordConfirmation": "Short123!@#"
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.invalid_fields(), vec!["password"]);
}

#[actix_web::test]
async fn confirm_password_checks_the_stored_hash() {
    let backend = TestBackend::new();
    backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let wrong = send(
        &app,
        Method::POST,
        "/api/v1/confirm-password",
        Some(&cookie),
        Some(json!({ "password": "Wrong123!@#" })),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.invalid_fields(), vec!["password"]);

    let right = send(
        &app,
        Method::POST,
        "/api/v1/confirm-password",
        Some(&cookie),
        Some(json!({ "password": MEMBER_PASSWORD })),
    )
    .await;
    assert_eq!(right.status, StatusCode::NO_CONTENT);
    assert!(right.cookie.is_some());
}

#[actix_web::test]
async fn self_deletion_needs_the_password_and_ends_the_session() {
    let backend = TestBackend::new();
    let member = backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let refused = send(
        &app,
        Method::DELETE,
        "/api/v1/settings/profile",
        Some(&cookie),
        Some(json!({ "password": "Wrong123!@#" })),
    )
    .await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
    assert!(
        backend
            .users
            .find_by_id(&member.id)
            .await
            .expect("lookup")
            .is_some()
    );

    let deleted = send(
        &app,
        Method::DELETE,
        "/api/v1/settings/profile",
        Some(&cookie),
        Some(json!({ "password": MEMBER_PASSWORD })),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(
        backend
            .users
            .find_by_id(&member.id)
            .await
            .expect("lookup")
            .is_none()
    );
}

#[actix_web::test]
async fn sessions_of_deleted_accounts_stop_working() {
    let backend = TestBackend::new();
    backend
        .seed("Admin", ADMIN_EMAIL, Role::Admin, ADMIN_PASSWORD)
        .await;
    let member = backend
        .seed("Member", MEMBER_EMAIL, Role::User, MEMBER_PASSWORD)
        .await;
    let app = test::init_service(backend.app()).await;
    let admin_cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let member_cookie = login(&app, MEMBER_EMAIL, MEMBER_PASSWORD).await;

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{}", member.id),
        Some(&admin_cookie),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Method::GET,
        "/api/v1/settings/profile",
        Some(&member_cookie),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(Method::PATCH, "/api/v1/settings/profile")]
#[case(Method::PUT, "/api/v1/settings/password")]
#[case(Method::DELETE, "/api/v1/settings/profile")]
#[case(Method::POST, "/api/v1/confirm-password")]
#[actix_web::test]
async fn anonymous_callers_get_unauthorised_even_with_mistyped_bodies(
    #[case] method: Method,
    #[case] path: &str,
) {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;

    let response = send(
        &app,
        method,
        path,
        None,
        Some(json!({"name": 5, "password": ["x"], "currentPassword": false})),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
