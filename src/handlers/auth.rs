use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRolesRequest {
    pub roles: Vec<Role>,
}

/// POST /auth/register - create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiResponse, ApiError> {
    let account = state.accounts.register(&body.username, &body.password).await?;
    Ok(ApiResponse::created("Account registered successfully.").field("user", account))
}

/// POST /auth/login - verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse, ApiError> {
    let session = state.accounts.login(&body.username, &body.password).await?;
    Ok(ApiResponse::ok("Login successful.")
        .field("access_token", &session.access_token)
        .field("expires_in", session.expires_in)
        .field("user", &session.account))
}

/// GET /auth/whoami - echo the verified caller identity
pub async fn whoami(Extension(auth): Extension<AuthUser>) -> ApiResponse {
    ApiResponse::ok("Authenticated.").field(
        "user",
        json!({
            "id": auth.user_id,
            "username": auth.username,
            "roles": auth.roles,
        }),
    )
}

/// PUT /auth/users/:username/roles - replace an account's role set (ADMIN)
pub async fn assign_roles(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<AssignRolesRequest>,
) -> Result<ApiResponse, ApiError> {
    let account = state.accounts.assign_roles(&username, body.roles).await?;
    Ok(ApiResponse::ok("Roles updated successfully.").field("user", account))
}
