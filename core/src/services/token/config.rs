//! Configuration for the token service

use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use tl_shared::TokenSettings;

use crate::domain::entities::token::{DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use crate::errors::{DomainError, DomainResult};

/// Validated, immutable configuration of one token service instance
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Shared secret for HMAC algorithms
    pub secret: Vec<u8>,
    /// Signing algorithm; tokens naming any other algorithm are rejected
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub reset_ttl: Duration,
    pub verification_ttl: Duration,
    pub issuer: String,
    pub audience: String,
    pub enable_refresh: bool,
    pub enable_revocation: bool,
    /// Quota hook for a surrounding component; not enforced here
    pub max_active_tokens: usize,
    /// API token TTL as a multiple of `access_ttl`
    pub api_ttl_multiplier: i32,
    /// PEM private key for asymmetric algorithms
    pub private_key_pem: Option<String>,
    /// PEM public key for asymmetric algorithms
    pub public_key_pem: Option<String>,
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .field("verification_ttl", &self.verification_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("enable_refresh", &self.enable_refresh)
            .field("enable_revocation", &self.enable_revocation)
            .field("max_active_tokens", &self.max_active_tokens)
            .field("api_ttl_multiplier", &self.api_ttl_multiplier)
            .finish()
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: b"development-secret-please-change-in-production".to_vec(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            reset_ttl: Duration::hours(1),
            verification_ttl: Duration::hours(24),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            enable_refresh: true,
            enable_revocation: true,
            max_active_tokens: 10,
            api_ttl_multiplier: 24,
            private_key_pem: None,
            public_key_pem: None,
        }
    }
}

impl TokenServiceConfig {
    /// HS256 configuration with the given secret and default lifetimes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Switch to an asymmetric algorithm with PEM key material
    pub fn with_pem_keys(
        mut self,
        algorithm: Algorithm,
        private_key_pem: impl Into<String>,
        public_key_pem: impl Into<String>,
    ) -> Self {
        self.algorithm = algorithm;
        self.private_key_pem = Some(private_key_pem.into());
        self.public_key_pem = Some(public_key_pem.into());
        self
    }

    /// Lifetime of API tokens, `access_ttl * api_ttl_multiplier`
    pub fn api_ttl(&self) -> DomainResult<Duration> {
        self.access_ttl
            .checked_mul(self.api_ttl_multiplier)
            .ok_or_else(|| invalid("API token TTL is out of range"))
    }

    pub fn is_hmac(&self) -> bool {
        matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        )
    }

    /// Checks the construction invariants
    pub fn validate(&self) -> DomainResult<()> {
        if self.is_hmac() && self.secret.is_empty() {
            return Err(invalid("secret must not be empty"));
        }
        if !self.is_hmac() && (self.private_key_pem.is_none() || self.public_key_pem.is_none()) {
            return Err(invalid(format!(
                "{:?} requires both a private and a public key",
                self.algorithm
            )));
        }
        if self.api_ttl_multiplier < 1 {
            return Err(invalid("API token TTL multiplier must be at least 1"));
        }

        let now = Utc::now();
        let ttls = [
            ("access", self.access_ttl),
            ("refresh", self.refresh_ttl),
            ("reset", self.reset_ttl),
            ("verification", self.verification_ttl),
            ("api", self.api_ttl()?),
        ];
        for (token_class, ttl) in ttls {
            if ttl <= Duration::zero() {
                return Err(invalid(format!("{} token TTL must be positive", token_class)));
            }
            if now.checked_add_signed(ttl).is_none() {
                return Err(invalid(format!("{} token TTL is out of range", token_class)));
            }
        }
        Ok(())
    }

    /// Builds a validated configuration from raw settings
    pub fn from_settings(settings: &TokenSettings) -> DomainResult<Self> {
        let algorithm_name = settings.algorithm.trim();
        if algorithm_name.is_empty() {
            return Err(invalid("algorithm must not be empty"));
        }
        let algorithm = Algorithm::from_str(algorithm_name)
            .map_err(|_| invalid(format!("unsupported algorithm: {}", algorithm_name)))?;

        let config = Self {
            secret: settings.secret.as_bytes().to_vec(),
            algorithm,
            access_ttl: ttl_seconds("access", settings.access_ttl_seconds)?,
            refresh_ttl: ttl_seconds("refresh", settings.refresh_ttl_seconds)?,
            reset_ttl: ttl_seconds("reset", settings.reset_ttl_seconds)?,
            verification_ttl: ttl_seconds("verification", settings.verification_ttl_seconds)?,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            enable_refresh: settings.enable_refresh,
            enable_revocation: settings.enable_revocation,
            max_active_tokens: settings.max_active_tokens,
            api_ttl_multiplier: settings.api_ttl_multiplier,
            private_key_pem: settings.private_key_pem.clone(),
            public_key_pem: settings.public_key_pem.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn ttl_seconds(token_class: &str, seconds: i64) -> DomainResult<Duration> {
    Duration::try_seconds(seconds)
        .ok_or_else(|| invalid(format!("{} token TTL is out of range", token_class)))
}

fn invalid(message: impl Into<String>) -> DomainError {
    DomainError::Validation {
        message: message.into(),
    }
}
