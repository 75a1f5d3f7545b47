use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RewardType {
    Point,
    Item,
    Badge,
}

/// A reward definition owned by an event.
///
/// Invariant: `required_attendance >= 1`, enforced at the catalog boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_attendance: u32,
    pub reward_type: RewardType,
    pub reward_value: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse update for a reward. Only fields present in the patch overwrite the
/// stored value; absence always means "keep", never "clear".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_attendance: Option<u32>,
    pub reward_type: Option<RewardType>,
    pub reward_value: Option<String>,
    pub is_active: Option<bool>,
}

impl Reward {
    /// Apply a sparse patch, returning the merged reward with a fresh
    /// `updated_at`.
    pub fn merged(&self, patch: RewardPatch) -> Reward {
        Reward {
            id: self.id,
            event_id: self.event_id,
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            required_attendance: patch.required_attendance.unwrap_or(self.required_attendance),
            reward_type: patch.reward_type.unwrap_or(self.reward_type),
            reward_value: patch.reward_value.unwrap_or_else(|| self.reward_value.clone()),
            is_active: patch.is_active.unwrap_or(self.is_active),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reward() -> Reward {
        let now = Utc::now();
        Reward {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            title: "7-day streak".into(),
            description: "Attend seven days in a row".into(),
            required_attendance: 7,
            reward_type: RewardType::Point,
            reward_value: "1000".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn merge_overwrites_only_present_fields() {
        let reward = sample_reward();
        let merged = reward.merged(RewardPatch {
            title: Some("new title".into()),
            ..Default::default()
        });

        assert_eq!(merged.title, "new title");
        assert_eq!(merged.description, reward.description);
        assert_eq!(merged.required_attendance, 7);
        assert_eq!(merged.reward_type, RewardType::Point);
        assert!(merged.is_active);
    }

    #[test]
    fn merge_preserves_identity_and_creation_time() {
        let reward = sample_reward();
        let merged = reward.merged(RewardPatch {
            is_active: Some(false),
            ..Default::default()
        });

        assert_eq!(merged.id, reward.id);
        assert_eq!(merged.event_id, reward.event_id);
        assert_eq!(merged.created_at, reward.created_at);
        assert!(!merged.is_active);
    }

    #[test]
    fn patch_deserializes_missing_fields_as_none() {
        let patch: RewardPatch = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("t"));
        assert!(patch.required_attendance.is_none());
        assert!(patch.is_active.is_none());
    }
}
