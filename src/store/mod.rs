// Abstract document-store repositories.
//
// The services only ever see these traits; the concrete backing store is an
// implementation detail. `memory` provides the in-process document store used
// by the server and the test suites.
pub mod memory;
pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::models::{
    Account, ClaimAttempt, Event, Reward, StatusKey, UserRewardStatus,
};
use crate::auth::Role;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result of the atomic claim transition attempt for one triple.
#[derive(Debug, Clone)]
pub enum ClaimDecision {
    /// Transitioned Eligible -> Claimed; the returned status is the updated
    /// record with `claimed_at` set.
    Granted(UserRewardStatus),
    /// The triple was already claimed; the record is unchanged.
    AlreadyClaimed(UserRewardStatus),
    /// Attendance below the reward threshold; the record is unchanged apart
    /// from the logged attempt.
    NotEligible(UserRewardStatus),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Returns false (and stores nothing) when the
    /// username is already taken.
    async fn insert(&self, account: Account) -> Result<bool, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Replace the role set of an existing account. None when the username is
    /// unknown.
    async fn set_roles(
        &self,
        username: &str,
        roles: Vec<Role>,
    ) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: Event) -> Result<(), StoreError>;

    async fn exists(&self, event_id: Uuid) -> Result<bool, StoreError>;

    /// All events, ordered by creation time.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
}

#[async_trait]
pub trait RewardStore: Send + Sync {
    async fn insert(&self, reward: Reward) -> Result<(), StoreError>;

    async fn find(&self, reward_id: Uuid) -> Result<Option<Reward>, StoreError>;

    /// Rewards owned by an event, ordered by creation time.
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Reward>, StoreError>;

    /// Overwrite an existing reward. Returns false when the id is unknown.
    async fn replace(&self, reward: Reward) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Idempotent lazy creation: returns the existing record for the triple
    /// or creates one with zeroed progress.
    async fn get_or_create(&self, key: StatusKey) -> Result<UserRewardStatus, StoreError>;

    /// Statuses matching the given filters, ordered by creation time.
    async fn find_by(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<UserRewardStatus>, StoreError>;

    /// Record one attendance unit for the triple, creating the record if
    /// absent. Eligibility is recomputed against `required_attendance`.
    async fn bump_attendance(
        &self,
        key: StatusKey,
        required_attendance: u32,
    ) -> Result<UserRewardStatus, StoreError>;

    /// Atomically apply the claim decision rule for one triple.
    ///
    /// This is the single-writer serialization point that preserves the
    /// at-most-one-successful-claim invariant: the "not yet claimed" check,
    /// the transition to Claimed, and the attempt-log append all happen inside
    /// one critical section per store. Concurrent calls for the same triple
    /// observe exactly one `Granted`.
    async fn try_claim(
        &self,
        key: StatusKey,
        required_attendance: u32,
        now: DateTime<Utc>,
    ) -> Result<ClaimDecision, StoreError>;

    /// Append-only claim-attempt history matching the given filters, ordered
    /// by request time.
    async fn attempt_history(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<ClaimAttempt>, StoreError>;
}
