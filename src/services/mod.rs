pub mod accounts;
pub mod catalog;
pub mod claim;
pub mod events;
pub mod tracker;

use std::sync::Arc;

use crate::store::memory::{
    MemoryAccountStore, MemoryEventStore, MemoryRewardStore, MemoryStatusStore,
};

pub use accounts::AccountService;
pub use catalog::CatalogService;
pub use claim::ClaimService;
pub use events::EventService;
pub use tracker::TrackerService;

/// Shared application state: one service per core component, all backed by
/// the same stores.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub events: EventService,
    pub catalog: CatalogService,
    pub tracker: TrackerService,
    pub claims: ClaimService,
}

impl AppState {
    /// Wire every service against fresh in-memory stores.
    pub fn new() -> Self {
        let accounts = Arc::new(MemoryAccountStore::default());
        let events = Arc::new(MemoryEventStore::default());
        let rewards = Arc::new(MemoryRewardStore::default());
        let statuses = Arc::new(MemoryStatusStore::default());

        Self {
            accounts: AccountService::new(accounts),
            events: EventService::new(events.clone()),
            catalog: CatalogService::new(rewards.clone(), events.clone()),
            tracker: TrackerService::new(statuses.clone(), rewards.clone(), events),
            claims: ClaimService::new(rewards, statuses),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
