//! AccountLinkingRepository port - Store behind Alexa account linking.
//!
//! When a user links a third-party account to the skill, the platform user id
//! is recorded here and exchanged for short-lived tokens:
//!
//! - a *mapping token* handed to the external identity provider during the
//!   linking flow, resolved back to the user once the provider calls us
//! - an *auth token* that Alexa later presents as the session access token
//!
//! Business handlers reach the store through this port only; the adaptation
//! core never calls it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A platform user known to the skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Errors from account-linking storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountLinkingError {
    #[error("User id cannot be empty")]
    EmptyUserId,

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Account linking store unavailable: {0}")]
    Storage(String),
}

/// Persistence for linked accounts and their tokens.
///
/// # Contract
///
/// Implementations must:
/// - Treat `save_user` as an upsert that keeps the original `created_at`
/// - Issue tokens only for users that were saved first
/// - Return `Ok(None)` for unknown, expired or revoked tokens
/// - Make `expire_*` idempotent
#[async_trait]
pub trait AccountLinkingRepository: Send + Sync {
    /// Look up a user by platform user id.
    async fn find_user(&self, user_id: &str) -> Result<Option<UserAccount>, AccountLinkingError>;

    /// Create or update a user, returning the stored record.
    async fn save_user(&self, user: UserAccount) -> Result<UserAccount, AccountLinkingError>;

    /// Issue a mapping token for the external identity provider.
    async fn generate_mapping_token(&self, user_id: &str) -> Result<String, AccountLinkingError>;

    /// Resolve a mapping token to the user it was issued for.
    async fn user_id_for_mapping_token(&self, token: &str) -> Result<Option<String>, AccountLinkingError>;

    /// Revoke a mapping token.
    async fn expire_mapping_token(&self, token: &str) -> Result<(), AccountLinkingError>;

    /// Issue the access token Alexa will present on later requests.
    async fn generate_auth_token(&self, user_id: &str) -> Result<String, AccountLinkingError>;

    /// Resolve an access token to its user.
    async fn user_id_for_auth_token(&self, token: &str) -> Result<Option<String>, AccountLinkingError>;

    /// Revoke an access token.
    async fn expire_auth_token(&self, token: &str) -> Result<(), AccountLinkingError>;
}
