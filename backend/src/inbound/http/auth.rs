//! Authentication, password confirmation and password reset handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"admin@app.com","password":"…"}
//! POST /api/v1/logout
//! POST /api/v1/confirm-password {"password":"…"}
//! POST /api/v1/forgot-password {"email":"admin@app.com"}
//! POST /api/v1/reset-password {"token":"…","email":"…","password":"…","passwordConfirmation":"…"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{LoginForm, ResetPasswordForm};
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::decode_body;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Message returned for every reset link request.
pub const RESET_LINK_MESSAGE: &str = "A reset link will be sent if the account exists.";

/// Resolve the acting user from the session.
///
/// The stored id is re-read through storage on every request; when the
/// account no longer exists the session is purged and the request is
/// rejected with `401`.
pub async fn current_actor(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    let id = session.require_user_id()?;
    match state.login.resolve_actor(&id).await? {
        Some(user) => Ok(user),
        None => {
            info!(user_id = %id, "session refers to a deleted account");
            session.purge();
            Err(Error::unauthorized("login required"))
        }
    }
}

/// Login request body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@app.com")]
    pub email: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
}

/// Password confirmation and account deletion body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordRequest {
    #[schema(format = Password)]
    pub password: Option<String>,
}

/// Reset link request body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// Password reset body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub email: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    #[schema(format = Password)]
    pub password_confirmation: Option<String>,
}

/// Plain acknowledgement payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let user = state.login.authenticate(LoginForm { email, password }).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(user.into()))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Re-verify the current password before sensitive actions.
#[utoipa::path(
    post,
    path = "/api/v1/confirm-password",
    request_body = PasswordRequest,
    responses(
        (status = 204, description = "Password confirmed"),
        (status = 400, description = "Password incorrect", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "confirmPassword"
)]
#[post("/confirm-password")]
pub async fn confirm_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let payload: PasswordRequest = decode_body(&body)?;
    state
        .settings
        .confirm_password(&actor, payload.password)
        .await?;
    session.mark_password_confirmed(state.clock.utc().timestamp())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Request a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Request accepted", body = StatusResponse),
        (status = 400, description = "Invalid email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    state
        .password_reset
        .request_reset_link(payload.into_inner().email)
        .await?;
    Ok(HttpResponse::Accepted().json(StatusResponse {
        message: RESET_LINK_MESSAGE.to_owned(),
    }))
}

/// Set a new password using a reset token.
#[utoipa::path(
    post,
    path = "/api/v1/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Validation failed or token invalid", body = Error)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ResetPasswordRequest {
        token,
        email,
        password,
        password_confirmation,
    } = payload.into_inner();
    state
        .password_reset
        .reset_password(ResetPasswordForm {
            token,
            email,
            password,
            password_confirmation,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
