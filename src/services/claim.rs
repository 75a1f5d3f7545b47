use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::store::models::{StatusKey, UserRewardStatus};
use crate::store::{ClaimDecision, RewardStore, StatusStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("reward not found: {0}")]
    RewardNotFound(Uuid),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The claim outcome returned to the caller. Business failures (already
/// claimed, insufficient attendance) are values here, never errors.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimReply {
    pub success: bool,
    pub message: String,
    pub status: Option<UserRewardStatus>,
}

/// Orchestrates a claim attempt: load the reward definition, apply the claim
/// decision rule atomically in the status store, and report the outcome.
/// Holds no state of its own.
#[derive(Clone)]
pub struct ClaimService {
    rewards: Arc<dyn RewardStore>,
    statuses: Arc<dyn StatusStore>,
}

impl ClaimService {
    pub fn new(rewards: Arc<dyn RewardStore>, statuses: Arc<dyn StatusStore>) -> Self {
        Self { rewards, statuses }
    }

    pub async fn request_reward(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        reward_id: Uuid,
    ) -> Result<ClaimReply, ClaimError> {
        let reward = self
            .rewards
            .find(reward_id)
            .await?
            .ok_or(ClaimError::RewardNotFound(reward_id))?;

        let key = StatusKey {
            user_id,
            event_id,
            reward_id,
        };
        let decision = self
            .statuses
            .try_claim(key, reward.required_attendance, Utc::now())
            .await?;

        let reply = match decision {
            ClaimDecision::Granted(status) => {
                tracing::debug!(%user_id, %reward_id, "reward granted");
                ClaimReply {
                    success: true,
                    message: "Reward granted successfully.".to_string(),
                    status: Some(status),
                }
            }
            ClaimDecision::AlreadyClaimed(status) => ClaimReply {
                success: false,
                message: "Reward already claimed.".to_string(),
                status: Some(status),
            },
            ClaimDecision::NotEligible(status) => ClaimReply {
                success: false,
                message: format!(
                    "Attendance insufficient (current: {}, required: {}).",
                    status.current_attendance, reward.required_attendance
                ),
                status: Some(status),
            },
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryRewardStore, MemoryStatusStore};
    use crate::store::models::{Reward, RewardType};

    struct Fixture {
        service: ClaimService,
        statuses: Arc<MemoryStatusStore>,
        event_id: Uuid,
        reward_id: Uuid,
    }

    async fn fixture(required: u32) -> Fixture {
        let rewards = Arc::new(MemoryRewardStore::default());
        let statuses = Arc::new(MemoryStatusStore::default());

        let now = Utc::now();
        let reward = Reward {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            title: "point pack".into(),
            description: String::new(),
            required_attendance: required,
            reward_type: RewardType::Point,
            reward_value: "500".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        crate::store::RewardStore::insert(rewards.as_ref(), reward.clone())
            .await
            .unwrap();

        Fixture {
            service: ClaimService::new(rewards, statuses.clone()),
            statuses,
            event_id: reward.event_id,
            reward_id: reward.id,
        }
    }

    async fn accrue(f: &Fixture, user_id: Uuid, times: u32, required: u32) {
        let key = StatusKey {
            user_id,
            event_id: f.event_id,
            reward_id: f.reward_id,
        };
        for _ in 0..times {
            f.statuses.bump_attendance(key, required).await.unwrap();
        }
    }

    #[tokio::test]
    async fn unknown_reward_is_an_error() {
        let f = fixture(1).await;
        assert!(matches!(
            f.service
                .request_reward(Uuid::new_v4(), f.event_id, Uuid::new_v4())
                .await,
            Err(ClaimError::RewardNotFound(_))
        ));
    }

    #[tokio::test]
    async fn insufficient_attendance_is_a_business_failure() {
        let f = fixture(3).await;
        let reply = f
            .service
            .request_reward(Uuid::new_v4(), f.event_id, f.reward_id)
            .await
            .unwrap();

        assert!(!reply.success);
        assert!(reply.message.to_lowercase().contains("insufficient"));
        let status = reply.status.unwrap();
        assert!(!status.is_claimed);
        assert_eq!(status.request_count, 1);
    }

    #[tokio::test]
    async fn claim_at_exact_threshold_succeeds() {
        let f = fixture(3).await;
        let user_id = Uuid::new_v4();
        accrue(&f, user_id, 3, 3).await;

        let reply = f
            .service
            .request_reward(user_id, f.event_id, f.reward_id)
            .await
            .unwrap();

        assert!(reply.success);
        let status = reply.status.unwrap();
        assert!(status.is_claimed);
        assert!(status.is_eligible);
        assert!(status.claimed_at.is_some());
    }

    #[tokio::test]
    async fn second_claim_reports_already_claimed() {
        let f = fixture(1).await;
        let user_id = Uuid::new_v4();
        accrue(&f, user_id, 1, 1).await;

        let first = f
            .service
            .request_reward(user_id, f.event_id, f.reward_id)
            .await
            .unwrap();
        assert!(first.success);

        let second = f
            .service
            .request_reward(user_id, f.event_id, f.reward_id)
            .await
            .unwrap();
        assert!(!second.success);
        assert!(second.message.to_lowercase().contains("already claimed"));
        // The claim is irrevocable: the record still shows the original grant
        let status = second.status.unwrap();
        assert!(status.is_claimed);
        assert_eq!(status.claimed_at, first.status.unwrap().claimed_at);
    }

    #[tokio::test]
    async fn concurrent_claims_yield_one_success() {
        let f = fixture(1).await;
        let user_id = Uuid::new_v4();
        accrue(&f, user_id, 1, 1).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = f.service.clone();
            let (event_id, reward_id) = (f.event_id, f.reward_id);
            handles.push(tokio::spawn(async move {
                service.request_reward(user_id, event_id, reward_id).await.unwrap()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().success {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
