use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::models::Event;
use crate::store::{EventStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),
    #[error("event not found: {0}")]
    NotFound(Uuid),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Thin event catalog. The reward core consumes only `exists`.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn create_event(
        &self,
        new_event: NewEvent,
        created_by: Uuid,
    ) -> Result<Event, EventError> {
        if new_event.title.trim().is_empty() {
            return Err(EventError::Validation(
                "Event title must not be empty".to_string(),
            ));
        }
        if new_event.end_date <= new_event.start_date {
            return Err(EventError::Validation(
                "Event end date must be after the start date".to_string(),
            ));
        }

        let event = Event::new(
            new_event.title,
            new_event.description,
            new_event.start_date,
            new_event.end_date,
            new_event.is_active,
            created_by,
        );
        self.store.insert(event.clone()).await?;

        tracing::info!(event_id = %event.id, title = %event.title, "created event");
        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, EventError> {
        Ok(self.store.list().await?)
    }

    pub async fn exists(&self, event_id: Uuid) -> Result<bool, EventError> {
        Ok(self.store.exists(event_id).await?)
    }
}
