use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::Role;

/// A registered user account with its explicitly assigned role set.
/// The salt and digest never serialize into responses.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    #[serde(skip_serializing)]
    pub salt: Uuid,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: String, password: &str, roles: Vec<Role>) -> Self {
        let salt = Uuid::new_v4();
        Self {
            id: Uuid::new_v4(),
            username,
            roles,
            salt,
            password_digest: digest(&salt, password),
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_digest
    }
}

fn digest(salt: &Uuid, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_verification() {
        let account = Account::new("alice".into(), "hunter2", vec![Role::User]);
        assert!(account.verify_password("hunter2"));
        assert!(!account.verify_password("hunter3"));
    }

    #[test]
    fn salted_digests_differ_per_account() {
        let a = Account::new("a".into(), "same-password", vec![Role::User]);
        let b = Account::new("b".into(), "same-password", vec![Role::User]);
        assert_ne!(a.password_digest, b.password_digest);
    }
}
