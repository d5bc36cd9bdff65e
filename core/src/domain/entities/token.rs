//! Token entities: claims, API tokens, token pairs and introspection views.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Default token issuer
pub const DEFAULT_ISSUER: &str = "tokenlife";

/// Default token audience
pub const DEFAULT_AUDIENCE: &str = "tokenlife-api";

/// `token_type` of every [`TokenPair`]
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Name given to API tokens issued without an explicit name
pub const DEFAULT_API_TOKEN_NAME: &str = "api-token";

/// Token class. Decides the TTL at issuance and which entry points accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token
    Auth,
    Refresh,
    Api,
    /// Password reset
    Reset,
    /// Email verification
    Verification,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Auth => "auth",
            TokenType::Refresh => "refresh",
            TokenType::Api => "api",
            TokenType::Reset => "reset",
            TokenType::Verification => "verification",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(TokenType::Auth),
            "refresh" => Ok(TokenType::Refresh),
            "api" => Ok(TokenType::Api),
            "reset" => Ok(TokenType::Reset),
            "verification" => Ok(TokenType::Verification),
            _ => Err(TokenError::MalformedToken),
        }
    }
}

/// Claims carried in the signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: String,

    /// Email, present on access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub token_type: TokenType,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,

    #[serde(default)]
    pub iss: String,

    #[serde(default)]
    pub aud: String,

    /// Token ID, the revocation key
    pub jti: String,

    /// Capabilities granted to an API token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl TokenClaims {
    /// Creates claims for `subject` with a fresh random token ID.
    ///
    /// `exp` is `issued_at + ttl` truncated to whole seconds. Fails with
    /// `TokenGenerationFailed` when that instant is not representable.
    pub fn new(
        subject: impl Into<String>,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::TokenGenerationFailed)?;

        Ok(Self {
            sub: subject.into(),
            email: None,
            token_type,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
            jti: Uuid::new_v4().to_string(),
            scopes: None,
        })
    }

    pub fn with_email(mut self, email: Option<&str>) -> Self {
        self.email = email.filter(|e| !e.is_empty()).map(str::to_string);
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    pub fn subject_id(&self) -> &str {
        &self.sub
    }

    pub fn token_id(&self) -> &str {
        &self.jti
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Scopes of an API token; empty for every other class
    pub fn scopes(&self) -> &[String] {
        self.scopes.as_deref().unwrap_or_default()
    }

    /// Whether `now` is past the expiry instant (millisecond precision)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.exp.saturating_mul(1000)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Structural validity: a subject and a non-zero expiry
    pub fn is_valid(&self) -> bool {
        !self.sub.is_empty() && self.exp != 0
    }

    /// Fails with `InsufficientScope` unless the token carries `scope`
    pub fn require_scope(&self, scope: &str) -> Result<(), TokenError> {
        require_scope(self.scopes(), scope)
    }
}

/// De-duplicates scopes, keeping first-seen order and dropping blanks
pub fn normalize_scopes(scopes: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(scopes.len());
    for scope in scopes {
        let scope = scope.trim();
        if !scope.is_empty() && !normalized.iter().any(|s| s == scope) {
            normalized.push(scope.to_string());
        }
    }
    normalized
}

/// Fails with `InsufficientScope` unless `scopes` contains `scope`
pub fn require_scope(scopes: &[String], scope: &str) -> Result<(), TokenError> {
    if scopes.iter().any(|s| s == scope) {
        Ok(())
    } else {
        Err(TokenError::InsufficientScope {
            scope: scope.to_string(),
        })
    }
}

/// A scoped, long-lived API token as handed back to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiToken {
    /// Display identifier; not the embedded `jti`
    pub id: Uuid,

    pub name: String,

    pub subject_id: String,

    /// The signed token string
    pub token: String,

    /// The `jti` embedded in the signed claims
    pub token_id: String,

    pub scopes: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl ApiToken {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    pub fn require_scope(&self, scope: &str) -> Result<(), TokenError> {
        require_scope(&self.scopes, scope)
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,

    pub refresh_token: String,

    /// Always `"bearer"`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Access token expiry
    pub expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in,
            expires_at,
        }
    }
}

/// Introspection view of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// The token ID (`jti`)
    pub id: String,

    pub subject_id: String,

    pub token_type: TokenType,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub is_revoked: bool,

    pub is_expired: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl TokenInfo {
    pub fn from_claims(claims: &TokenClaims, is_revoked: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: claims.jti.clone(),
            subject_id: claims.sub.clone(),
            token_type: claims.token_type,
            created_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            is_revoked,
            is_expired: claims.is_expired_at(now),
            scopes: claims.scopes.clone(),
        }
    }

    /// Neither revoked nor expired
    pub fn is_active(&self) -> bool {
        !self.is_revoked && !self.is_expired
    }
}

#[cfg(test)]
#[path = "tests/token_tests.rs"]
mod tests;
