//! Token validation: the single choke point for trusting a token

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::token::{TokenClaims, TokenType};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Decodes tokens and applies revocation, expiry, claim and type checks.
///
/// Checks run in a fixed order and the first failure is terminal:
/// signature, revocation, expiry, required claims, issuer/audience.
/// Validation never mutates state.
pub struct TokenValidator<S: RevocationStore> {
    codec: Arc<TokenCodec>,
    store: Arc<S>,
    config: Arc<TokenServiceConfig>,
}

impl<S: RevocationStore> TokenValidator<S> {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<S>, config: Arc<TokenServiceConfig>) -> Self {
        Self {
            codec,
            store,
            config,
        }
    }

    /// Validates a token of any class
    ///
    /// # Returns
    ///
    /// * `Ok(TokenClaims)` - The token is authentic, live and addressed to us
    /// * `Err(DomainError)` - `MalformedToken`, `InvalidSignature`,
    ///   `TokenRevoked`, `TokenExpired` or `InvalidToken`
    pub async fn validate(&self, token: &str) -> DomainResult<TokenClaims> {
        let claims = self.codec.decode(token)?;

        if self.config.enable_revocation && self.store.is_revoked(&claims.jti).await? {
            debug!("Rejected revoked token {}", claims.jti);
            return Err(TokenError::TokenRevoked.into());
        }

        if claims.is_expired_at(Utc::now()) {
            debug!("Rejected expired token {}", claims.jti);
            return Err(TokenError::TokenExpired.into());
        }

        if claims.sub.is_empty() {
            return Err(TokenError::MalformedToken.into());
        }

        if claims.iss != self.config.issuer {
            return Err(TokenError::InvalidToken {
                reason: format!("unexpected issuer {:?}", claims.iss),
            }
            .into());
        }
        if claims.aud != self.config.audience {
            return Err(TokenError::InvalidToken {
                reason: format!("unexpected audience {:?}", claims.aud),
            }
            .into());
        }

        Ok(claims)
    }

    /// Validates a token and requires it to be of class `expected`
    pub async fn validate_type(&self, token: &str, expected: TokenType) -> DomainResult<TokenClaims> {
        let claims = self.validate(token).await?;
        if claims.token_type != expected {
            debug!(
                "Rejected {} token {} where {} was required",
                claims.token_type, claims.jti, expected
            );
            return Err(TokenError::wrong_type(expected, claims.token_type).into());
        }
        Ok(claims)
    }

    pub async fn validate_access(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validate_type(token, TokenType::Auth).await
    }

    /// Validates an API token and returns its scopes (possibly empty)
    pub async fn validate_api(&self, token: &str) -> DomainResult<(TokenClaims, Vec<String>)> {
        let claims = self.validate_type(token, TokenType::Api).await?;
        let scopes = claims.scopes().to_vec();
        Ok((claims, scopes))
    }

    pub async fn validate_reset(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validate_type(token, TokenType::Reset).await
    }

    pub async fn validate_verification(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validate_type(token, TokenType::Verification).await
    }
}
