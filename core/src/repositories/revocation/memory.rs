//! Process-local revocation store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Revocation store guarded by a single reader/writer lock.
///
/// Lookups take the read lock and run concurrently with each other; `revoke`
/// and `sweep` take the write lock.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `is_revoked` evaluated against an explicit clock
    pub async fn is_revoked_at(&self, token_id: &str, now: DateTime<Utc>) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(token_id)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// `sweep` evaluated against an explicit clock
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.insert(token_id.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, DomainError> {
        Ok(self.is_revoked_at(token_id, Utc::now()).await)
    }

    async fn sweep(&self) -> Result<usize, DomainError> {
        Ok(self.sweep_at(Utc::now()).await)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}
