//! Token service module
//!
//! - Claims codec: compact signed tokens with per-token algorithm pinning
//! - Issuance for access, refresh, API, reset and verification tokens
//! - Validation against signature, revocation, expiry and token class
//! - Refresh, revocation and introspection
//! - Background sweeping of expired revocation entries

mod cleanup;
mod codec;
mod config;
mod issuer;
mod keys;
mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use cleanup::{RevocationSweeper, SweepResult, SweeperConfig};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use keys::SigningKeys;
pub use service::TokenService;
pub use validator::TokenValidator;
