//! User management handlers.
//!
//! ```text
//! GET    /api/v1/users?page=1&perPage=10
//! POST   /api/v1/users {"name":"Ann","email":"ann@example.com","password":"…","role":"user"}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Query strings and bodies are decoded only after the role gate, so
//! non-admins are refused before any input is inspected.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ListUsersQuery, UserForm, UserPage};
use crate::domain::{Error, RequestContext, Role, User, UserPolicy};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::payload::{decode_body, decode_query};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Public view of a user; the password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// RFC 3339 timestamp, absent until the address is verified.
    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            role: user.role,
            email_verified_at: user.email_verified_at.map(|at| at.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// One page of users, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u64,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        let last_page = page.last_page();
        Self {
            page: page.request.page(),
            per_page: page.request.per_page(),
            total: page.total,
            last_page,
            data: page.users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

/// Raw pagination parameters; validated by the domain.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// One-based page number (default 1).
    pub page: Option<String>,
    /// Records per page, 1 to 100 (default 10).
    pub per_page: Option<String>,
}

impl From<ListUsersParams> for ListUsersQuery {
    fn from(params: ListUsersParams) -> Self {
        Self {
            page: params.page,
            per_page: params.per_page,
        }
    }
}

/// Body for creating or updating a user.
///
/// On update an absent or empty `password` keeps the current one.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    #[schema(example = "user")]
    pub role: Option<String>,
}

impl From<UserRequest> for UserForm {
    fn from(request: UserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        }
    }
}

/// List users page by page.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 400, description = "Invalid pagination", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<web::Json<UserListResponse>> {
    let actor = current_actor(&state, &session).await?;
    UserPolicy.require_manager(&actor)?;
    let params: ListUsersParams = decode_query(request.query_string())?;
    let page = state.users.list_users(&actor, params.into()).await?;
    Ok(web::Json(page.into()))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    context: RequestContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    UserPolicy.require_manager(&actor)?;
    let payload: UserRequest = decode_body(&body)?;
    let created = state
        .users
        .create_user(&actor, payload.into(), &context)
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// Update a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    context: RequestContext,
    id: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = current_actor(&state, &session).await?;
    UserPolicy.require_manager(&actor)?;
    let payload: UserRequest = decode_body(&body)?;
    let updated = state
        .users
        .update_user(&actor, &id, payload.into(), &context)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Delete a user other than the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    context: RequestContext,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    state.users.delete_user(&actor, &id, &context).await?;
    Ok(HttpResponse::NoContent().finish())
}
