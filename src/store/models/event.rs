use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An attendance event. The reward core only consumes existence checks;
/// everything else here is plain catalog data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        is_active: bool,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            start_date,
            end_date,
            is_active,
            created_by,
            created_at: Utc::now(),
        }
    }
}
