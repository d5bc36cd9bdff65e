//! # TokenLife Core
//!
//! Token lifecycle engine: issues, verifies, revokes and refreshes short-lived
//! signed credential tokens (access, refresh, API, password-reset and
//! email-verification).
//!
//! The engine runs inside one process. Revocation state lives behind the
//! [`RevocationStore`] trait so a shared backing store can replace the
//! in-memory registry without touching issuance or validation.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
