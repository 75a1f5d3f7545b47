use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{roles, Role};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Static operation -> required-role-set table. Every protected route
/// declares its requirement here; the guard consults it before any handler
/// body runs. No runtime introspection.
pub mod policy {
    use crate::auth::Role;

    pub const ROLE_ASSIGN: &[Role] = &[Role::Admin];
    pub const EVENT_CREATE: &[Role] = &[Role::Operator, Role::Admin];
    pub const EVENT_ATTENDANCE: &[Role] = &[Role::Operator, Role::Admin];
    pub const REWARD_CREATE: &[Role] = &[Role::Operator, Role::Admin];
    pub const REWARD_UPDATE: &[Role] = &[Role::Admin];
    pub const REWARD_REQUEST: &[Role] = &[Role::User];
    pub const REWARD_STATUS: &[Role] = &[Role::User, Role::Operator, Role::Auditor, Role::Admin];
    pub const REWARD_HISTORY: &[Role] = &[Role::Auditor, Role::Admin];
}

/// Role guard middleware. Applied per route under the JWT middleware, so a
/// verified `AuthUser` is already present; a missing one means the route was
/// wired outside the authentication layer and is rejected outright.
pub async fn require_roles(
    required: &'static [Role],
    request: Request,
    next: Next,
) -> Response {
    if required.is_empty() {
        return next.run(request).await;
    }

    let Some(auth) = request.extensions().get::<AuthUser>() else {
        return ApiError::unauthorized("Authentication required").into_response();
    };

    if roles::satisfies(&auth.roles, required) {
        next.run(request).await
    } else {
        tracing::debug!(
            username = %auth.username,
            required = %roles::describe(required),
            "request forbidden: insufficient role"
        );
        ApiError::forbidden(format!(
            "Insufficient role. Required one of: {}",
            roles::describe(required)
        ))
        .into_response()
    }
}
