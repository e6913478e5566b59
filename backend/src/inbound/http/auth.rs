//! Session endpoints.
//!
//! ```text
//! POST /auth/login {"email":"agent@example.com","password":"Reporter2024"}
//! POST /auth/refresh            (refreshToken cookie)
//! POST /auth/logout
//! POST /auth/force-reset {"newPassword":"..."}
//! POST /auth/reset-password {"currentPassword":"...","newPassword":"..."}
//! GET  /auth/me
//! ```
//!
//! Login and refresh return the access token in the body and rotate the
//! refresh token cookie.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthSession;
use crate::domain::{Error, LoginCredentials, NewPassword, UserIdentity, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cookies::presented_refresh_token;
use crate::inbound::http::identity::SessionUser;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required};

const PASSWORD_UPDATED: &str = "Password updated successfully";

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "field.agent@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(&value.email, &value.password)?)
    }
}

/// Body returned by login and refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub user: UserIdentity,
}

/// Body of `POST /auth/force-reset`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceResetRequest {
    pub new_password: Option<String>,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

fn new_password(raw: Option<String>) -> Result<NewPassword, Error> {
    let raw = required(raw, FieldName::new("newPassword"))?;
    Ok(NewPassword::new(&raw)?)
}

fn session_response(state: &HttpState, session: AuthSession) -> HttpResponse {
    let cookie = state.refresh_cookie.issue(&session.refresh_token);
    HttpResponse::Ok().cookie(cookie).json(SessionResponse {
        access_token: session.access_token.token,
        user: session.user,
    })
}

/// Check credentials and open a session.
///
/// Registered by the server behind the login rate limiter, so it carries no
/// route attribute.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "refreshToken cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 429, description = "Too many login attempts", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.login.login(&credentials).await?;
    Ok(session_response(&state, session))
}

/// Exchange the refresh cookie for a new access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Session renewed", body = SessionResponse),
        (status = 401, description = "Missing, expired, or reused refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refresh",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let session = state.login.refresh(presented_refresh_token(&req)).await?;
    Ok(session_response(&state, session))
}

/// End the session and clear the refresh cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    user: SessionUser,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    state
        .login
        .logout(&user, presented_refresh_token(&req))
        .await?;
    Ok(HttpResponse::Ok()
        .cookie(state.refresh_cookie.clear())
        .json(MessageResponse::new("Logged out successfully")))
}

/// Replace a temporary password.
#[utoipa::path(
    post,
    path = "/auth/force-reset",
    request_body = ForceResetRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Password fails policy", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "forceReset"
)]
#[post("/auth/force-reset")]
pub async fn force_reset(
    state: web::Data<HttpState>,
    user: SessionUser,
    payload: web::Json<ForceResetRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let password = new_password(payload.into_inner().new_password)?;
    state.account.force_reset(&user, password).await?;
    Ok(web::Json(MessageResponse::new(PASSWORD_UPDATED)))
}

/// Change the caller's password.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Wrong current password or policy failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    user: SessionUser,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let ChangePasswordRequest {
        current_password,
        new_password: raw_new,
    } = payload.into_inner();
    let current = required(current_password, FieldName::new("currentPassword"))?;
    let password = new_password(raw_new)?;
    state
        .account
        .change_password(&user, &current, password)
        .await?;
    Ok(web::Json(MessageResponse::new(PASSWORD_UPDATED)))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account deleted", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    user: SessionUser,
) -> ApiResult<web::Json<UserProfile>> {
    state.account.profile(&user).await.map(web::Json)
}

#[cfg(test)]
mod tests;
