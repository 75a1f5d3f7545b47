use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::store::models::{Reward, RewardPatch, RewardType};
use crate::store::{EventStore, RewardStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
    #[error("reward not found: {0}")]
    RewardNotFound(Uuid),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct NewReward {
    pub event_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_attendance: u32,
    pub reward_type: RewardType,
    pub reward_value: String,
    pub is_active: bool,
}

/// Owns reward definitions: creation, listing per event, and sparse updates.
#[derive(Clone)]
pub struct CatalogService {
    rewards: Arc<dyn RewardStore>,
    events: Arc<dyn EventStore>,
}

impl CatalogService {
    pub fn new(rewards: Arc<dyn RewardStore>, events: Arc<dyn EventStore>) -> Self {
        Self { rewards, events }
    }

    pub async fn create_reward(&self, new_reward: NewReward) -> Result<Reward, CatalogError> {
        if new_reward.required_attendance < 1 {
            return Err(CatalogError::Validation(
                "required_attendance must be at least 1".to_string(),
            ));
        }
        if !self.events.exists(new_reward.event_id).await? {
            return Err(CatalogError::Validation(format!(
                "event '{}' does not exist",
                new_reward.event_id
            )));
        }

        let now = Utc::now();
        let reward = Reward {
            id: Uuid::new_v4(),
            event_id: new_reward.event_id,
            title: new_reward.title,
            description: new_reward.description,
            required_attendance: new_reward.required_attendance,
            reward_type: new_reward.reward_type,
            reward_value: new_reward.reward_value,
            is_active: new_reward.is_active,
            created_at: now,
            updated_at: now,
        };
        self.rewards.insert(reward.clone()).await?;

        tracing::info!(
            reward_id = %reward.id,
            event_id = %reward.event_id,
            required_attendance = reward.required_attendance,
            "created reward"
        );
        Ok(reward)
    }

    /// All rewards tied to an event, active and inactive, in creation order.
    pub async fn rewards_for_event(&self, event_id: Uuid) -> Result<Vec<Reward>, CatalogError> {
        Ok(self.rewards.list_for_event(event_id).await?)
    }

    /// Sparse update: only fields present in the patch are overwritten.
    pub async fn update_reward(
        &self,
        reward_id: Uuid,
        patch: RewardPatch,
    ) -> Result<Reward, CatalogError> {
        if matches!(patch.required_attendance, Some(0)) {
            return Err(CatalogError::Validation(
                "required_attendance must be at least 1".to_string(),
            ));
        }

        let reward = self
            .rewards
            .find(reward_id)
            .await?
            .ok_or(CatalogError::RewardNotFound(reward_id))?;

        let merged = reward.merged(patch);
        if !self.rewards.replace(merged.clone()).await? {
            // Raced with a concurrent removal; treat as missing
            return Err(CatalogError::RewardNotFound(reward_id));
        }

        tracing::info!(reward_id = %merged.id, "updated reward");
        Ok(merged)
    }
}
