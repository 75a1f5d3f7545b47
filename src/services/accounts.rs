use std::sync::Arc;

use crate::auth::{self, Claims, Role, TokenError};
use crate::config;
use crate::store::models::Account;
use crate::store::{AccountStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("username already registered: {0}")]
    DuplicateUsername(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("unknown user: {0}")]
    NotFound(String),
    #[error("token service error: {0}")]
    Token(#[from] TokenError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A signed session issued at login.
#[derive(Debug)]
pub struct Session {
    pub access_token: String,
    pub expires_in: u64,
    pub account: Account,
}

/// Registration, login, and the explicit identity-to-role mapping.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// Role assignment is explicit: everyone gets USER, and usernames listed
    /// in the bootstrap-admin configuration additionally get ADMIN. There is
    /// deliberately no inference from the shape of the username.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AccountError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        let mut roles = vec![Role::User];
        if config::config()
            .security
            .bootstrap_admins
            .iter()
            .any(|name| name == username)
        {
            roles.push(Role::Admin);
        }

        let account = Account::new(username.to_string(), password, roles);
        if !self.store.insert(account.clone()).await? {
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }

        tracing::info!(username, "registered account");
        Ok(account)
    }

    /// Verify credentials and issue a signed token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AccountError> {
        let account = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !account.verify_password(password) {
            tracing::debug!(username, "login rejected: bad password");
            return Err(AccountError::InvalidCredentials);
        }

        let claims = Claims::new(account.id, account.username.clone(), account.roles.clone());
        let access_token = auth::issue_token(&claims)?;

        Ok(Session {
            access_token,
            expires_in: config::config().security.jwt_expiry_secs,
            account,
        })
    }

    /// Replace an account's role set. Caller authorization (ADMIN only) is
    /// enforced at the route guard.
    pub async fn assign_roles(
        &self,
        username: &str,
        roles: Vec<Role>,
    ) -> Result<Account, AccountError> {
        if roles.is_empty() {
            return Err(AccountError::Validation(
                "Role set must not be empty".to_string(),
            ));
        }

        let account = self
            .store
            .set_roles(username, roles)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))?;

        tracing::info!(username, roles = ?account.roles, "updated account roles");
        Ok(account)
    }
}

fn validate_username(username: &str) -> Result<(), AccountError> {
    if username.len() < 2 {
        return Err(AccountError::Validation(
            "Username must be at least 2 characters".to_string(),
        ));
    }
    if username.len() > 64 {
        return Err(AccountError::Validation(
            "Username must be at most 64 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AccountError::Validation(
            "Username can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }
    Ok(())
}
