//! Self-service account settings handlers.
//!
//! ```text
//! GET    /api/v1/settings/profile
//! PATCH  /api/v1/settings/profile {"name":"Ann","email":"ann@example.com"}
//! PUT    /api/v1/settings/password {"currentPassword":"…","password":"…","passwordConfirmation":"…"}
//! DELETE /api/v1/settings/profile {"password":"…"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{PasswordChangeForm, ProfileForm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{PasswordRequest, current_actor};
use crate::inbound::http::payload::decode_body;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Profile update body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Password change body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[schema(format = Password)]
    pub current_password: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    #[schema(format = Password)]
    pub password_confirmation: Option<String>,
}

/// Fetch the logged-in user.
#[utoipa::path(
    get,
    path = "/api/v1/settings/profile",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["settings"],
    operation_id = "getProfile"
)]
#[get("/settings/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-store"))
        .json(UserResponse::from(actor)))
}

/// Update the logged-in user's name and email.
///
/// Changing the email clears its verification timestamp.
#[utoipa::path(
    patch,
    path = "/api/v1/settings/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["settings"],
    operation_id = "updateProfile"
)]
#[patch("/settings/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = current_actor(&state, &session).await?;
    let ProfileRequest { name, email } = decode_body(&body)?;
    let updated = state
        .settings
        .update_profile(&actor, ProfileForm { name, email })
        .await?;
    Ok(web::Json(updated.into()))
}

/// Change the logged-in user's password.
#[utoipa::path(
    put,
    path = "/api/v1/settings/password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["settings"],
    operation_id = "changePassword"
)]
#[put("/settings/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let PasswordChangeRequest {
        current_password,
        password,
        password_confirmation,
    } = decode_body(&body)?;
    state
        .settings
        .change_password(
            &actor,
            PasswordChangeForm {
                current_password,
                password,
                password_confirmation,
            },
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete the logged-in user's account and end the session.
#[utoipa::path(
    delete,
    path = "/api/v1/settings/profile",
    request_body = PasswordRequest,
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Password incorrect", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["settings"],
    operation_id = "deleteAccount"
)]
#[delete("/settings/profile")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let payload: PasswordRequest = decode_body(&body)?;
    state
        .settings
        .delete_account(&actor, payload.password)
        .await?;
    session.purge();
    info!(user_id = %actor.id, "account deleted by owner");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
