use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::services::events::NewEvent;
use crate::services::AppState;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordAttendanceRequest {
    pub user_id: Uuid,
}

/// POST /events - create an attendance event (OPERATOR, ADMIN)
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateEventRequest>,
) -> Result<ApiResponse, ApiError> {
    let event = state
        .events
        .create_event(
            NewEvent {
                title: body.title,
                description: body.description,
                start_date: body.start_date,
                end_date: body.end_date,
                is_active: body.is_active,
            },
            auth.user_id,
        )
        .await?;
    Ok(ApiResponse::created("Event created successfully.").field("event", event))
}

/// GET /events - list events (any authenticated caller)
pub async fn list_events(State(state): State<AppState>) -> Result<ApiResponse, ApiError> {
    let events = state.events.list_events().await?;
    Ok(ApiResponse::ok("Events retrieved successfully.").field("events", events))
}

/// POST /events/:event_id/attendance - record one attendance unit for a user
/// (OPERATOR, ADMIN). This is the external accrual boundary the reward core
/// observes.
pub async fn record_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<RecordAttendanceRequest>,
) -> Result<ApiResponse, ApiError> {
    let statuses = state.tracker.record_attendance(body.user_id, event_id).await?;
    Ok(ApiResponse::ok("Attendance recorded successfully.").field("statuses", statuses))
}
