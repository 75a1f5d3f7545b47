use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The (user, event, reward) triple identifying one reward-eligibility
/// relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusKey {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub reward_id: Uuid,
}

/// Per-triple attendance progress, eligibility, and claim state.
///
/// Invariants:
/// - `is_claimed` implies `is_eligible`
/// - `claimed_at` is set iff `is_claimed`
/// - `is_claimed` never reverts to false
/// - `current_attendance` is monotonically non-decreasing
/// - `request_count` equals the number of logged claim attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRewardStatus {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub reward_id: Uuid,
    pub current_attendance: u32,
    pub is_eligible: bool,
    pub is_claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    pub request_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRewardStatus {
    pub fn new(key: StatusKey) -> Self {
        let now = Utc::now();
        Self {
            user_id: key.user_id,
            event_id: key.event_id,
            reward_id: key.reward_id,
            current_attendance: 0,
            is_eligible: false,
            is_claimed: false,
            claimed_at: None,
            request_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> StatusKey {
        StatusKey {
            user_id: self.user_id,
            event_id: self.event_id,
            reward_id: self.reward_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimOutcome {
    Granted,
    AlreadyClaimed,
    NotEligible,
}

/// One entry of the append-only claim-attempt log kept per triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimAttempt {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub reward_id: Uuid,
    pub outcome: ClaimOutcome,
    pub attendance_at_request: u32,
    pub required_attendance: u32,
    pub requested_at: DateTime<Utc>,
}
