//! Revocation registry: the set of token IDs that must be rejected even though
//! their signature and expiry are otherwise valid.

mod r#trait;
pub use r#trait::RevocationStore;

mod memory;
pub use memory::InMemoryRevocationStore;
