//! Revocation store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Storage for revoked token IDs.
///
/// Entries carry the expiry of the token they revoke. Once that instant has
/// passed the token fails its own expiry check, so the entry no longer counts
/// as revoked and may be swept. Implementations must allow concurrent
/// `is_revoked` calls; it sits on every validation.
///
/// The in-process [`InMemoryRevocationStore`](super::InMemoryRevocationStore)
/// does not replicate across instances. Deployments with more than one node
/// need an implementation backed by a shared store.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token_id` as revoked until `expires_at`.
    ///
    /// Idempotent: revoking again only overwrites the recorded expiry.
    async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// True only if an entry exists and its expiry has not yet passed.
    ///
    /// Stale entries are left in place; removing them is `sweep`'s job.
    async fn is_revoked(&self, token_id: &str) -> Result<bool, DomainError>;

    /// Remove every entry whose expiry has passed.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries removed
    async fn sweep(&self) -> Result<usize, DomainError>;

    /// Number of entries currently held, stale ones included
    async fn len(&self) -> Result<usize, DomainError>;
}
