use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: Uuid, username: String, roles: Vec<Role>) -> Self {
        let now = Utc::now();
        let expiry_secs = config::config().security.jwt_expiry_secs;
        let exp = (now + Duration::seconds(expiry_secs as i64)).timestamp();

        Self {
            sub,
            username,
            roles,
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Sign a token for the given identity. Expiry is fixed by configuration.
pub fn issue_token(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature and expiry and return the embedded identity.
///
/// Side-effect free: a bad token is an Err value, never a panic. Signature
/// mismatch, malformed payload, and expiry all collapse into
/// `TokenError::Invalid`.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Invalid(e.to_string()))
}
