use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::services::catalog::NewReward;
use crate::services::AppState;
use crate::store::models::{RewardPatch, RewardType};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateRewardRequest {
    pub event_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_attendance: u32,
    pub reward_type: RewardType,
    pub reward_value: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RequestRewardRequest {
    pub event_id: Uuid,
    pub reward_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub user_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

/// POST /rewards - create a reward definition (OPERATOR, ADMIN)
pub async fn create_reward(
    State(state): State<AppState>,
    Json(body): Json<CreateRewardRequest>,
) -> Result<ApiResponse, ApiError> {
    let reward = state
        .catalog
        .create_reward(NewReward {
            event_id: body.event_id,
            title: body.title,
            description: body.description,
            required_attendance: body.required_attendance,
            reward_type: body.reward_type,
            reward_value: body.reward_value,
            is_active: body.is_active,
        })
        .await?;
    Ok(ApiResponse::created("Reward created successfully.").field("reward", reward))
}

/// GET /rewards/event/:event_id - list rewards for an event (any authenticated)
pub async fn list_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<ApiResponse, ApiError> {
    let rewards = state.catalog.rewards_for_event(event_id).await?;
    Ok(ApiResponse::ok("Rewards retrieved successfully.").field("rewards", rewards))
}

/// PUT /rewards/:reward_id - sparse update of a reward (ADMIN)
pub async fn update_reward(
    State(state): State<AppState>,
    Path(reward_id): Path<Uuid>,
    Json(patch): Json<RewardPatch>,
) -> Result<ApiResponse, ApiError> {
    let reward = state.catalog.update_reward(reward_id, patch).await?;
    Ok(ApiResponse::ok("Reward updated successfully.").field("reward", reward))
}

/// POST /rewards/request - attempt a claim (USER)
///
/// The user id always comes from the verified token, never from the body.
/// Business failures ("already claimed", "attendance insufficient") return
/// 200 with `success: false`.
pub async fn request_reward(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<RequestRewardRequest>,
) -> Result<ApiResponse, ApiError> {
    let reply = state
        .claims
        .request_reward(auth.user_id, body.event_id, body.reward_id)
        .await?;

    let response = if reply.success {
        ApiResponse::ok(reply.message)
    } else {
        ApiResponse::business_failure(reply.message)
    };
    Ok(response.field("status", reply.status))
}

/// GET /rewards/status - statuses for a user and/or event
///
/// Plain USER callers may only query their own id: an explicit different
/// user_id is rejected with 403 (the strict policy), and an omitted user_id
/// defaults to their own. Privileged callers (OPERATOR, AUDITOR, ADMIN) must
/// name the user they are querying.
pub async fn status_query(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<StatusQuery>,
) -> Result<ApiResponse, ApiError> {
    let user_id = resolve_target_user(&auth, query.user_id)?;
    let statuses = state
        .tracker
        .statuses_for_query(Some(user_id), query.event_id)
        .await?;
    Ok(ApiResponse::ok("Reward statuses retrieved successfully.").field("statuses", statuses))
}

/// GET /rewards/history - append-only claim-attempt log (AUDITOR, ADMIN)
pub async fn claim_history(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<ApiResponse, ApiError> {
    let attempts = state
        .tracker
        .attempt_history(query.user_id, query.event_id)
        .await?;
    Ok(ApiResponse::ok("Claim history retrieved successfully.").field("attempts", attempts))
}

fn resolve_target_user(auth: &AuthUser, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    if auth.is_privileged() {
        requested.ok_or_else(|| ApiError::bad_request("A target user_id must be supplied"))
    } else {
        match requested {
            Some(id) if id != auth.user_id => Err(ApiError::forbidden(
                "USER role may only query its own reward status",
            )),
            _ => Ok(auth.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn caller(roles: Vec<Role>) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: "caller".into(),
            roles,
        }
    }

    #[test]
    fn plain_user_defaults_to_own_id() {
        let auth = caller(vec![Role::User]);
        assert_eq!(resolve_target_user(&auth, None).unwrap(), auth.user_id);
        assert_eq!(
            resolve_target_user(&auth, Some(auth.user_id)).unwrap(),
            auth.user_id
        );
    }

    #[test]
    fn plain_user_cannot_query_others() {
        let auth = caller(vec![Role::User]);
        let result = resolve_target_user(&auth, Some(Uuid::new_v4()));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn privileged_callers_must_name_a_user() {
        let auth = caller(vec![Role::Operator]);
        assert!(matches!(
            resolve_target_user(&auth, None),
            Err(ApiError::BadRequest(_))
        ));

        let other = Uuid::new_v4();
        assert_eq!(resolve_target_user(&auth, Some(other)).unwrap(), other);
    }

    #[test]
    fn admin_user_combination_keeps_privileged_access() {
        let auth = caller(vec![Role::User, Role::Admin]);
        let other = Uuid::new_v4();
        assert_eq!(resolve_target_user(&auth, Some(other)).unwrap(), other);
    }
}
