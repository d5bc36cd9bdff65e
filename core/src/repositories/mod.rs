//! Repository interfaces for state the token engine keeps.

pub mod revocation;

pub use revocation::{InMemoryRevocationStore, RevocationStore};
