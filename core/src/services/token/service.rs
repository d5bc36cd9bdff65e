//! Main token service: issuance, validation, refresh, revocation and
//! introspection behind one handle

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::token::{ApiToken, TokenClaims, TokenInfo, TokenPair, TokenType};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::{InMemoryRevocationStore, RevocationStore};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::keys::SigningKeys;
use super::validator::TokenValidator;

/// Service for issuing, validating, refreshing and revoking tokens
pub struct TokenService<S: RevocationStore> {
    config: Arc<TokenServiceConfig>,
    codec: Arc<TokenCodec>,
    store: Arc<S>,
    issuer: TokenIssuer,
    validator: TokenValidator<S>,
}

impl TokenService<InMemoryRevocationStore> {
    /// Creates a service backed by a fresh process-local revocation store
    pub fn in_memory(config: TokenServiceConfig) -> DomainResult<Self> {
        Self::new(Arc::new(InMemoryRevocationStore::new()), config)
    }
}

impl<S: RevocationStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Revocation store consulted on every validation
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `DomainError` if the configuration is invalid
    /// or the key material cannot be loaded
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> DomainResult<Self> {
        config.validate()?;

        let keys = SigningKeys::from_config(&config)?;
        let codec = Arc::new(TokenCodec::new(keys));
        let config = Arc::new(config);

        info!(
            "Token service ready: algorithm={:?}, refresh={}, revocation={}",
            config.algorithm, config.enable_refresh, config.enable_revocation
        );

        Ok(Self {
            issuer: TokenIssuer::new(codec.clone(), config.clone()),
            validator: TokenValidator::new(codec.clone(), store.clone(), config.clone()),
            config,
            codec,
            store,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator<S> {
        &self.validator
    }

    /// The revocation store, shared with background sweeping
    pub fn store(&self) -> Arc<S> {
        self.store.clone()
    }

    pub fn issue_access(
        &self,
        subject_id: &str,
        email: Option<&str>,
    ) -> DomainResult<(String, DateTime<Utc>)> {
        self.issuer.issue_access(subject_id, email)
    }

    pub fn issue_refresh(&self, subject_id: &str) -> DomainResult<String> {
        self.issuer.issue_refresh(subject_id)
    }

    pub fn issue_api(&self, subject_id: &str, scopes: &[String]) -> DomainResult<ApiToken> {
        self.issuer.issue_api(subject_id, scopes)
    }

    pub fn issue_reset(&self, subject_id: &str) -> DomainResult<String> {
        self.issuer.issue_reset(subject_id)
    }

    pub fn issue_verification(&self, subject_id: &str) -> DomainResult<String> {
        self.issuer.issue_verification(subject_id)
    }

    pub fn issue_pair(&self, subject_id: &str, email: Option<&str>) -> DomainResult<TokenPair> {
        self.issuer.issue_pair(subject_id, email)
    }

    pub async fn validate(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validator.validate(token).await
    }

    pub async fn validate_access(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validator.validate_access(token).await
    }

    pub async fn validate_api(&self, token: &str) -> DomainResult<(TokenClaims, Vec<String>)> {
        self.validator.validate_api(token).await
    }

    pub async fn validate_reset(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validator.validate_reset(token).await
    }

    pub async fn validate_verification(&self, token: &str) -> DomainResult<TokenClaims> {
        self.validator.validate_verification(token).await
    }

    /// Exchanges a refresh token for a new access token
    ///
    /// The returned pair carries the same refresh token string, unchanged.
    /// Refresh tokens are not rotated on use.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New access token plus the presented refresh token
    /// * `Err(DomainError)` - Any validation failure, `InvalidToken` for a
    ///   non-refresh token, `FeatureDisabled` when refresh is turned off
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        if !self.config.enable_refresh {
            return Err(disabled("refresh"));
        }

        let claims = self
            .validator
            .validate_type(refresh_token, TokenType::Refresh)
            .await?;

        let (access_token, expires_at) = self
            .issuer
            .issue_access(&claims.sub, claims.email.as_deref())?;

        debug!("Refreshed access token for subject {}", claims.sub);

        Ok(TokenPair::new(
            access_token,
            refresh_token.to_string(),
            self.config.access_ttl.num_seconds(),
            expires_at,
        ))
    }

    /// Revokes a token until its natural expiry
    ///
    /// The signature must verify; expiry is not checked, so revoking an
    /// already expired token succeeds and its entry is swept right away.
    pub async fn revoke(&self, token: &str) -> DomainResult<()> {
        if !self.config.enable_revocation {
            return Err(disabled("revocation"));
        }

        let claims = self.codec.decode(token)?;
        self.store.revoke(&claims.jti, claims.expires_at()).await?;
        info!(
            "Revoked {} token {} for subject {}",
            claims.token_type, claims.jti, claims.sub
        );

        let swept = self.store.sweep().await?;
        if swept > 0 {
            debug!("Swept {} expired revocation entries", swept);
        }
        Ok(())
    }

    /// Describes a token without judging it; fails only if it cannot be decoded
    pub async fn inspect(&self, token: &str) -> DomainResult<TokenInfo> {
        let claims = self.codec.decode(token)?;
        let is_revoked = self.store.is_revoked(&claims.jti).await?;
        Ok(TokenInfo::from_claims(&claims, is_revoked, Utc::now()))
    }
}

fn disabled(feature: &str) -> crate::errors::DomainError {
    TokenError::FeatureDisabled {
        feature: feature.to_string(),
    }
    .into()
}
