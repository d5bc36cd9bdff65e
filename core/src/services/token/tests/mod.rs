//! Tests for the token services

mod codec_tests;
mod service_tests;

use std::fmt::Debug;

use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::InMemoryRevocationStore;
use crate::services::token::{TokenService, TokenServiceConfig};

pub(super) const TEST_SECRET: &str = "test-secret-for-token-lifecycle";

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(TEST_SECRET)
}

pub(super) fn create_test_service() -> TokenService<InMemoryRevocationStore> {
    TokenService::in_memory(test_config()).expect("Failed to create token service")
}

/// Unwraps the token error kind of a failed call
pub(super) fn token_error<T: Debug>(result: DomainResult<T>) -> TokenError {
    match result {
        Err(DomainError::Token(error)) => error,
        other => panic!("expected a token error, got {:?}", other),
    }
}
