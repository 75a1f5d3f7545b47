use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Builder for the uniform response envelope `{success, message, ...payload}`.
///
/// Business failures (e.g. "already claimed") travel as `success: false` with
/// a 200 status; transport-level failures use `ApiError` instead.
#[derive(Debug)]
pub struct ApiResponse {
    success: bool,
    message: String,
    status_code: StatusCode,
    payload: Map<String, Value>,
}

impl ApiResponse {
    /// A successful 200 response
    pub fn ok(message: impl Into<String>) -> Self {
        Self::with_status(true, message, StatusCode::OK)
    }

    /// A successful 201 Created response
    pub fn created(message: impl Into<String>) -> Self {
        Self::with_status(true, message, StatusCode::CREATED)
    }

    /// A business failure: 200 status, success flag false
    pub fn business_failure(message: impl Into<String>) -> Self {
        Self::with_status(false, message, StatusCode::OK)
    }

    fn with_status(success: bool, message: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            success,
            message: message.into(),
            status_code,
            payload: Map::new(),
        }
    }

    /// Attach a payload field to the envelope
    pub fn field(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(&value) {
            Ok(v) => {
                self.payload.insert(key.to_string(), v);
            }
            Err(e) => {
                tracing::error!("failed to serialize response field '{}': {}", key, e);
            }
        }
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("success".to_string(), json!(self.success));
        body.insert("message".to_string(), json!(self.message));
        body.extend(self.payload);

        (self.status_code, Json(Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_flattened_payload() {
        let response = ApiResponse::ok("done").field("answer", 42);
        assert!(response.success);
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(response.payload["answer"], json!(42));
    }

    #[test]
    fn business_failure_is_still_a_200() {
        let response = ApiResponse::business_failure("already claimed");
        assert!(!response.success);
        assert_eq!(response.status_code, StatusCode::OK);
    }
}
