// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-safe messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    // 401 Unauthorized
    Unauthorized(String),
    // 403 Forbidden
    Forbidden(String),
    // 404 Not Found
    NotFound(String),
    // 409 Conflict
    Conflict(String),
    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to the uniform response envelope body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "message": self.message(),
            "code": self.error_code(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert lower-layer error types to ApiError
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        // Log the real error but return a generic message
        tracing::error!("store error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Invalid(msg) => {
                ApiError::unauthorized(format!("Invalid token: {}", msg))
            }
            other => {
                tracing::error!("token service error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::accounts::AccountError> for ApiError {
    fn from(err: crate::services::accounts::AccountError) -> Self {
        use crate::services::accounts::AccountError;
        match err {
            AccountError::DuplicateUsername(name) => {
                ApiError::conflict(format!("Username '{}' is already registered", name))
            }
            AccountError::InvalidCredentials => {
                ApiError::unauthorized("Invalid username or password")
            }
            AccountError::Validation(msg) => ApiError::bad_request(msg),
            AccountError::NotFound(name) => {
                ApiError::not_found(format!("Unknown user '{}'", name))
            }
            AccountError::Token(e) => e.into(),
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<crate::services::catalog::CatalogError> for ApiError {
    fn from(err: crate::services::catalog::CatalogError) -> Self {
        use crate::services::catalog::CatalogError;
        match err {
            CatalogError::Validation(msg) => ApiError::bad_request(msg),
            CatalogError::RewardNotFound(id) => {
                ApiError::not_found(format!("Reward '{}' not found", id))
            }
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<crate::services::events::EventError> for ApiError {
    fn from(err: crate::services::events::EventError) -> Self {
        use crate::services::events::EventError;
        match err {
            EventError::Validation(msg) => ApiError::bad_request(msg),
            EventError::NotFound(id) => ApiError::not_found(format!("Event '{}' not found", id)),
            EventError::Store(e) => e.into(),
        }
    }
}

impl From<crate::services::tracker::TrackerError> for ApiError {
    fn from(err: crate::services::tracker::TrackerError) -> Self {
        use crate::services::tracker::TrackerError;
        match err {
            TrackerError::MissingFilter => {
                ApiError::bad_request("At least one of user_id or event_id must be supplied")
            }
            TrackerError::EventNotFound(id) => {
                ApiError::not_found(format!("Event '{}' not found", id))
            }
            TrackerError::Store(e) => e.into(),
        }
    }
}

impl From<crate::services::claim::ClaimError> for ApiError {
    fn from(err: crate::services::claim::ClaimError) -> Self {
        use crate::services::claim::ClaimError;
        match err {
            ClaimError::RewardNotFound(id) => {
                ApiError::not_found(format!("Reward '{}' not found", id))
            }
            ClaimError::Store(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
