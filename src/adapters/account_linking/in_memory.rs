//! In-memory account-linking store.
//!
//! Suitable for development, tests and single-instance deployments. Nothing
//! survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::ports::{AccountLinkingError, AccountLinkingRepository, UserAccount};

#[derive(Debug, Clone)]
struct IssuedToken {
    user_id: String,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, UserAccount>,
    mapping_tokens: HashMap<String, IssuedToken>,
    auth_tokens: HashMap<String, IssuedToken>,
}

/// In-memory implementation of [`AccountLinkingRepository`].
///
/// Tokens never lapse on their own unless a lifetime is set with
/// [`InMemoryAccountLinkingRepository::with_token_ttl`].
#[derive(Debug, Default)]
pub struct InMemoryAccountLinkingRepository {
    state: RwLock<State>,
    token_ttl: Option<Duration>,
}

impl InMemoryAccountLinkingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens older than `ttl` resolve to nothing.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = Some(ttl);
        self
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    fn is_live(&self, token: &IssuedToken, now: DateTime<Utc>) -> bool {
        self.token_ttl
            .map_or(true, |ttl| now.signed_duration_since(token.issued_at) < ttl)
    }

    async fn issue(
        &self,
        user_id: &str,
        pick: fn(&mut State) -> &mut HashMap<String, IssuedToken>,
    ) -> Result<String, AccountLinkingError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(user_id) {
            return Err(AccountLinkingError::UnknownUser(user_id.to_string()));
        }

        let token = Uuid::new_v4().to_string();
        pick(&mut *state).insert(
            token.clone(),
            IssuedToken {
                user_id: user_id.to_string(),
                issued_at: Utc::now(),
            },
        );
        Ok(token)
    }

    async fn resolve(
        &self,
        token: &str,
        pick: fn(&State) -> &HashMap<String, IssuedToken>,
    ) -> Option<String> {
        let state = self.state.read().await;
        pick(&*state)
            .get(token)
            .filter(|issued| self.is_live(issued, Utc::now()))
            .map(|issued| issued.user_id.clone())
    }
}

#[async_trait]
impl AccountLinkingRepository for InMemoryAccountLinkingRepository {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserAccount>, AccountLinkingError> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn save_user(&self, user: UserAccount) -> Result<UserAccount, AccountLinkingError> {
        if user.user_id.trim().is_empty() {
            return Err(AccountLinkingError::EmptyUserId);
        }

        let mut state = self.state.write().await;
        let stored = state
            .users
            .entry(user.user_id.clone())
            .or_insert(user)
            .clone();
        Ok(stored)
    }

    async fn generate_mapping_token(&self, user_id: &str) -> Result<String, AccountLinkingError> {
        let token = self.issue(user_id, |s| &mut s.mapping_tokens).await?;
        debug!(user_id, "Issued account mapping token");
        Ok(token)
    }

    async fn user_id_for_mapping_token(&self, token: &str) -> Result<Option<String>, AccountLinkingError> {
        Ok(self.resolve(token, |s| &s.mapping_tokens).await)
    }

    async fn expire_mapping_token(&self, token: &str) -> Result<(), AccountLinkingError> {
        self.state.write().await.mapping_tokens.remove(token);
        Ok(())
    }

    async fn generate_auth_token(&self, user_id: &str) -> Result<String, AccountLinkingError> {
        let token = self.issue(user_id, |s| &mut s.auth_tokens).await?;
        debug!(user_id, "Issued account auth token");
        Ok(token)
    }

    async fn user_id_for_auth_token(&self, token: &str) -> Result<Option<String>, AccountLinkingError> {
        Ok(self.resolve(token, |s| &s.auth_tokens).await)
    }

    async fn expire_auth_token(&self, token: &str) -> Result<(), AccountLinkingError> {
        self.state.write().await.auth_tokens.remove(token);
        Ok(())
    }
}
