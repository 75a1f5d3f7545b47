use std::sync::Arc;

use uuid::Uuid;

use crate::store::models::{ClaimAttempt, StatusKey, UserRewardStatus};
use crate::store::{EventStore, RewardStore, StatusStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("at least one of user_id or event_id is required")]
    MissingFilter,
    #[error("event not found: {0}")]
    EventNotFound(Uuid),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Owns the per-triple status records: lazy creation, filtered queries with
/// auto-provisioning, attendance accrual, and the claim-attempt audit log.
#[derive(Clone)]
pub struct TrackerService {
    statuses: Arc<dyn StatusStore>,
    rewards: Arc<dyn RewardStore>,
    events: Arc<dyn EventStore>,
}

impl TrackerService {
    pub fn new(
        statuses: Arc<dyn StatusStore>,
        rewards: Arc<dyn RewardStore>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self {
            statuses,
            rewards,
            events,
        }
    }

    pub async fn get_or_create(&self, key: StatusKey) -> Result<UserRewardStatus, TrackerError> {
        Ok(self.statuses.get_or_create(key).await?)
    }

    /// Statuses matching the filters. At least one filter is required; a
    /// supplied event_id must exist. When both filters are present and no
    /// records match, a status record is materialized for every reward of the
    /// event so first-time queries see the full zeroed progress set.
    pub async fn statuses_for_query(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<UserRewardStatus>, TrackerError> {
        if user_id.is_none() && event_id.is_none() {
            return Err(TrackerError::MissingFilter);
        }
        if let Some(event_id) = event_id {
            if !self.events.exists(event_id).await? {
                return Err(TrackerError::EventNotFound(event_id));
            }
        }

        let statuses = self.statuses.find_by(user_id, event_id).await?;
        if !statuses.is_empty() {
            return Ok(statuses);
        }

        match (user_id, event_id) {
            (Some(user_id), Some(event_id)) => {
                self.provision_for_event(user_id, event_id).await
            }
            _ => Ok(statuses),
        }
    }

    /// Record one attendance unit for a user across every reward of an event.
    ///
    /// This is the external accrual boundary: attendance only ever moves up,
    /// and eligibility is recomputed against each reward's threshold.
    pub async fn record_attendance(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<UserRewardStatus>, TrackerError> {
        if !self.events.exists(event_id).await? {
            return Err(TrackerError::EventNotFound(event_id));
        }

        let rewards = self.rewards.list_for_event(event_id).await?;
        let mut statuses = Vec::with_capacity(rewards.len());
        for reward in rewards {
            let key = StatusKey {
                user_id,
                event_id,
                reward_id: reward.id,
            };
            let status = self
                .statuses
                .bump_attendance(key, reward.required_attendance)
                .await?;
            statuses.push(status);
        }

        tracing::debug!(%user_id, %event_id, count = statuses.len(), "recorded attendance");
        Ok(statuses)
    }

    /// Append-only claim-attempt log, for auditing.
    pub async fn attempt_history(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<ClaimAttempt>, TrackerError> {
        if user_id.is_none() && event_id.is_none() {
            return Err(TrackerError::MissingFilter);
        }
        Ok(self.statuses.attempt_history(user_id, event_id).await?)
    }

    async fn provision_for_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<UserRewardStatus>, TrackerError> {
        let rewards = self.rewards.list_for_event(event_id).await?;
        let mut statuses = Vec::with_capacity(rewards.len());
        for reward in rewards {
            let key = StatusKey {
                user_id,
                event_id,
                reward_id: reward.id,
            };
            statuses.push(self.statuses.get_or_create(key).await?);
        }
        Ok(statuses)
    }
}
