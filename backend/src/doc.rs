//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::auth::{
    ForgotPasswordRequest, LoginRequest, PasswordRequest, ResetPasswordRequest, StatusResponse,
};
use crate::inbound::http::settings::{PasswordChangeRequest, ProfileRequest};
use crate::inbound::http::users::{UserListResponse, UserRequest, UserResponse};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI description of every `/api/v1` endpoint.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Accounts API",
        description = "Session-authenticated user accounts and role-based user management."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::confirm_password,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::settings::get_profile,
        crate::inbound::http::settings::update_profile,
        crate::inbound::http::settings::change_password,
        crate::inbound::http::settings::delete_account,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        UserResponse,
        UserListResponse,
        UserRequest,
        LoginRequest,
        PasswordRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        StatusResponse,
        ProfileRequest,
        PasswordChangeRequest,
    )),
    tags(
        (name = "auth", description = "Login, logout and password recovery"),
        (name = "users", description = "Administrative user management"),
        (name = "settings", description = "Self-service account settings")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_and_the_cookie_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/confirm-password",
            "/api/v1/forgot-password",
            "/api/v1/reset-password",
            "/api/v1/users",
            "/api/v1/users/{id}",
            "/api/v1/settings/profile",
            "/api/v1/settings/password",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
        let schemes = doc
            .components
            .as_ref()
            .map(|components| components.security_schemes.clone())
            .unwrap_or_default();
        assert!(schemes.contains_key("SessionCookie"));
    }

    #[test]
    fn user_schema_has_no_password_hash() {
        let json = ApiDoc::openapi().to_json().expect("serialise");
        assert!(!json.contains("passwordHash"));
    }
}
