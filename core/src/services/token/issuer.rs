//! Token issuance for every token class

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{
    normalize_scopes, ApiToken, TokenClaims, TokenPair, TokenType, DEFAULT_API_TOKEN_NAME,
};
use crate::errors::{DomainError, DomainResult};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Builds claims with the right shape and TTL for each token class and signs
/// them. Never touches the revocation store.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    config: Arc<TokenServiceConfig>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, config: Arc<TokenServiceConfig>) -> Self {
        Self { codec, config }
    }

    /// Issues an access (`auth`) token
    ///
    /// # Returns
    ///
    /// * `Ok((String, DateTime<Utc>))` - The signed token and its expiry, equal
    ///   to the embedded `exp`
    /// * `Err(DomainError)` - Empty subject or signing failure
    pub fn issue_access(
        &self,
        subject_id: &str,
        email: Option<&str>,
    ) -> DomainResult<(String, DateTime<Utc>)> {
        let claims = self
            .claims(subject_id, TokenType::Auth, self.config.access_ttl)?
            .with_email(email);
        let expires_at = claims.expires_at();
        Ok((self.sign(&claims)?, expires_at))
    }

    /// Issues a refresh token; refresh tokens never carry an email
    pub fn issue_refresh(&self, subject_id: &str) -> DomainResult<String> {
        let claims = self.claims(subject_id, TokenType::Refresh, self.config.refresh_ttl)?;
        self.sign(&claims)
    }

    /// Issues an API token named [`DEFAULT_API_TOKEN_NAME`]
    pub fn issue_api(&self, subject_id: &str, scopes: &[String]) -> DomainResult<ApiToken> {
        self.issue_named_api(subject_id, DEFAULT_API_TOKEN_NAME, scopes)
    }

    /// Issues a scoped API token living `api_ttl_multiplier` access lifetimes.
    ///
    /// Scopes are de-duplicated in first-seen order; an empty list is allowed.
    pub fn issue_named_api(
        &self,
        subject_id: &str,
        name: &str,
        scopes: &[String],
    ) -> DomainResult<ApiToken> {
        let scopes = normalize_scopes(scopes);
        let claims = self
            .claims(subject_id, TokenType::Api, self.config.api_ttl()?)?
            .with_scopes(scopes.clone());
        let token = self.sign(&claims)?;

        Ok(ApiToken {
            id: Uuid::new_v4(),
            name: name.to_string(),
            subject_id: claims.sub.clone(),
            token,
            token_id: claims.jti.clone(),
            scopes,
            created_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        })
    }

    /// Issues a password reset token
    pub fn issue_reset(&self, subject_id: &str) -> DomainResult<String> {
        let claims = self.claims(subject_id, TokenType::Reset, self.config.reset_ttl)?;
        self.sign(&claims)
    }

    /// Issues an email verification token
    pub fn issue_verification(&self, subject_id: &str) -> DomainResult<String> {
        let claims = self.claims(
            subject_id,
            TokenType::Verification,
            self.config.verification_ttl,
        )?;
        self.sign(&claims)
    }

    /// Issues an access token and a refresh token together, as at login
    pub fn issue_pair(&self, subject_id: &str, email: Option<&str>) -> DomainResult<TokenPair> {
        let (access_token, expires_at) = self.issue_access(subject_id, email)?;
        let refresh_token = self.issue_refresh(subject_id)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl.num_seconds(),
            expires_at,
        ))
    }

    fn claims(
        &self,
        subject_id: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> DomainResult<TokenClaims> {
        if subject_id.is_empty() {
            return Err(DomainError::Validation {
                message: "subject id must not be empty".to_string(),
            });
        }

        let claims = TokenClaims::new(
            subject_id,
            token_type,
            Utc::now(),
            ttl,
            &self.config.issuer,
            &self.config.audience,
        )?;
        Ok(claims)
    }

    fn sign(&self, claims: &TokenClaims) -> DomainResult<String> {
        let token = self.codec.encode(claims)?;
        debug!(
            "Issued {} token {} for subject {}",
            claims.token_type, claims.jti, claims.sub
        );
        Ok(token)
    }
}
