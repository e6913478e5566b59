//! Account administration endpoints.
//!
//! ```text
//! GET    /users
//! POST   /users {"email":"agent@example.com","role":"user","tempPassword":"Welcome1"}
//! PATCH  /users/{id}/reset-password {"tempPassword":"Welcome2"}
//! PATCH  /users/{id}/role {"role":"admin"}
//! DELETE /users/{id}
//! ```
//!
//! Role rules live in the domain; these handlers only parse payloads.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewAccount;
use crate::domain::{Email, Error, Role, TemporaryPassword, UserIdentity, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id, required};

/// Body of `POST /users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "field.agent@example.com")]
    pub email: Option<String>,
    #[schema(example = "user")]
    pub role: Option<String>,
    pub temp_password: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewAccount {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let email = Email::new(value.email.unwrap_or_default())?;
        let role = Role::assignable(&required(value.role, FieldName::new("role"))?)?;
        let temporary_password = temporary_password(value.temp_password)?;
        Ok(Self {
            email,
            role,
            temporary_password,
        })
    }
}

/// Body returned by `POST /users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserIdentity,
}

/// Body of `PATCH /users/{id}/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub temp_password: Option<String>,
}

/// Body of `PATCH /users/{id}/role`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ChangeRoleRequest {
    #[schema(example = "admin")]
    pub role: Option<String>,
}

fn temporary_password(raw: Option<String>) -> Result<TemporaryPassword, Error> {
    let raw = required(raw, FieldName::new("tempPassword"))?;
    Ok(TemporaryPassword::new(&raw)?)
}

/// Accounts visible to the caller.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Accounts, newest first", body = [UserSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    state.users.list_users(&user).await.map(web::Json)
}

/// Open an account with a temporary password.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = CreatedUserResponse),
        (status = 400, description = "Invalid payload or email already exists", body = Error),
        (status = 403, description = "Role not grantable by the caller", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let account = NewAccount::try_from(payload.into_inner())?;
    let created = state.users_command.create_user(&user, account).await?;
    Ok(HttpResponse::Created().json(CreatedUserResponse {
        message: "User created successfully".to_owned(),
        user: created,
    }))
}

/// Issue a new temporary password.
#[utoipa::path(
    patch,
    path = "/users/{id}/reset-password",
    params(("id" = String, Path, description = "Account identifier")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "resetUserPassword"
)]
#[patch("/users/{id}/reset-password")]
pub async fn reset_user_password(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let target = parse_user_id(&path.into_inner())?;
    let password = temporary_password(payload.into_inner().temp_password)?;
    state
        .users_command
        .reset_password(&user, &target, password)
        .await?;
    Ok(web::Json(MessageResponse::new("Password reset successfully")))
}

/// Grant a different role.
#[utoipa::path(
    patch,
    path = "/users/{id}/role",
    params(("id" = String, Path, description = "Account identifier")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 403, description = "Only the CEO may change roles", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "changeUserRole"
)]
#[patch("/users/{id}/role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<ChangeRoleRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let target = parse_user_id(&path.into_inner())?;
    let role = Role::assignable(&required(payload.into_inner().role, FieldName::new("role"))?)?;
    state.users_command.change_role(&user, &target, role).await?;
    Ok(web::Json(MessageResponse::new("Role updated successfully")))
}

/// Delete an account and everything it owns.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Only the CEO may delete accounts", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let target = parse_user_id(&path.into_inner())?;
    state.users_command.delete_user(&user, &target).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests;
