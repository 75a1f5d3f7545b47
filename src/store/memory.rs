// In-process document store.
//
// Each store holds its documents behind a tokio RwLock; the status store's
// write lock doubles as the per-claim critical section required by
// `StatusStore::try_claim`.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Role;
use crate::store::models::{
    Account, ClaimAttempt, ClaimOutcome, Event, Reward, StatusKey, UserRewardStatus,
};
use crate::store::{
    AccountStore, ClaimDecision, EventStore, RewardStore, StatusStore, StoreError,
};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Ok(false);
        }
        accounts.insert(account.username.clone(), account);
        Ok(true)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn set_roles(
        &self,
        username: &str,
        roles: Vec<Role>,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(username).map(|account| {
            account.roles = roles;
            account.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<HashMap<Uuid, Event>>,
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: Event) -> Result<(), StoreError> {
        self.events.write().await.insert(event.id, event);
        Ok(())
    }

    async fn exists(&self, event_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.events.read().await.contains_key(&event_id))
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }
}

#[derive(Default)]
pub struct MemoryRewardStore {
    rewards: RwLock<HashMap<Uuid, Reward>>,
}

#[async_trait]
impl RewardStore for MemoryRewardStore {
    async fn insert(&self, reward: Reward) -> Result<(), StoreError> {
        self.rewards.write().await.insert(reward.id, reward);
        Ok(())
    }

    async fn find(&self, reward_id: Uuid) -> Result<Option<Reward>, StoreError> {
        Ok(self.rewards.read().await.get(&reward_id).cloned())
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Reward>, StoreError> {
        let mut rewards: Vec<Reward> = self
            .rewards
            .read()
            .await
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        rewards.sort_by_key(|r| r.created_at);
        Ok(rewards)
    }

    async fn replace(&self, reward: Reward) -> Result<bool, StoreError> {
        let mut rewards = self.rewards.write().await;
        match rewards.get_mut(&reward.id) {
            Some(slot) => {
                *slot = reward;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Status record plus its append-only attempt log, kept together so one write
/// lock covers both.
struct StatusEntry {
    status: UserRewardStatus,
    attempts: Vec<ClaimAttempt>,
}

impl StatusEntry {
    fn new(key: StatusKey) -> Self {
        Self {
            status: UserRewardStatus::new(key),
            attempts: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStatusStore {
    entries: RwLock<HashMap<StatusKey, StatusEntry>>,
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get_or_create(&self, key: StatusKey) -> Result<UserRewardStatus, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key).or_insert_with(|| StatusEntry::new(key));
        Ok(entry.status.clone())
    }

    async fn find_by(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<UserRewardStatus>, StoreError> {
        let entries = self.entries.read().await;
        let mut statuses: Vec<UserRewardStatus> = entries
            .values()
            .filter(|e| user_id.map_or(true, |u| e.status.user_id == u))
            .filter(|e| event_id.map_or(true, |ev| e.status.event_id == ev))
            .map(|e| e.status.clone())
            .collect();
        statuses.sort_by_key(|s| s.created_at);
        Ok(statuses)
    }

    async fn bump_attendance(
        &self,
        key: StatusKey,
        required_attendance: u32,
    ) -> Result<UserRewardStatus, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key).or_insert_with(|| StatusEntry::new(key));
        let status = &mut entry.status;
        status.current_attendance += 1;
        if !status.is_claimed {
            status.is_eligible = status.current_attendance >= required_attendance;
        }
        status.updated_at = Utc::now();
        Ok(status.clone())
    }

    async fn try_claim(
        &self,
        key: StatusKey,
        required_attendance: u32,
        now: DateTime<Utc>,
    ) -> Result<ClaimDecision, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key).or_insert_with(|| StatusEntry::new(key));

        let outcome = if entry.status.is_claimed {
            ClaimOutcome::AlreadyClaimed
        } else if entry.status.current_attendance >= required_attendance {
            entry.status.is_eligible = true;
            entry.status.is_claimed = true;
            entry.status.claimed_at = Some(now);
            ClaimOutcome::Granted
        } else {
            ClaimOutcome::NotEligible
        };

        entry.attempts.push(ClaimAttempt {
            user_id: key.user_id,
            event_id: key.event_id,
            reward_id: key.reward_id,
            outcome,
            attendance_at_request: entry.status.current_attendance,
            required_attendance,
            requested_at: now,
        });
        entry.status.request_count = entry.attempts.len() as u32;
        entry.status.updated_at = now;

        let status = entry.status.clone();
        Ok(match outcome {
            ClaimOutcome::Granted => ClaimDecision::Granted(status),
            ClaimOutcome::AlreadyClaimed => ClaimDecision::AlreadyClaimed(status),
            ClaimOutcome::NotEligible => ClaimDecision::NotEligible(status),
        })
    }

    async fn attempt_history(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<ClaimAttempt>, StoreError> {
        let entries = self.entries.read().await;
        let mut attempts: Vec<ClaimAttempt> = entries
            .values()
            .flat_map(|e| e.attempts.iter())
            .filter(|a| user_id.map_or(true, |u| a.user_id == u))
            .filter(|a| event_id.map_or(true, |ev| a.event_id == ev))
            .cloned()
            .collect();
        attempts.sort_by_key(|a| a.requested_at);
        Ok(attempts)
    }
}
