//! Token signing and lifecycle configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Raw token settings as read from configuration files and the environment.
///
/// Durations are plain seconds here; `tl_core` turns them into a validated
/// `TokenServiceConfig`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenSettings {
    /// Shared secret for HMAC signing
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,

    /// Password reset token lifetime in seconds
    #[serde(default = "default_reset_ttl")]
    pub reset_ttl_seconds: i64,

    /// Email verification token lifetime in seconds
    #[serde(default = "default_verification_ttl")]
    pub verification_ttl_seconds: i64,

    /// `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Signing algorithm name (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_true")]
    pub enable_refresh: bool,

    #[serde(default = "default_true")]
    pub enable_revocation: bool,

    /// Quota hook for callers; the engine does not enforce it
    #[serde(default = "default_max_active_tokens")]
    pub max_active_tokens: usize,

    /// API token lifetime as a multiple of the access token lifetime
    #[serde(default = "default_api_ttl_multiplier")]
    pub api_ttl_multiplier: i32,

    /// PEM private key for RS*/PS*/ES*/EdDSA algorithms
    #[serde(default)]
    pub private_key_pem: Option<String>,

    /// PEM public key for RS*/PS*/ES*/EdDSA algorithms
    #[serde(default)]
    pub public_key_pem: Option<String>,

    /// Interval of the background revocation sweep (0 disables it)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            reset_ttl_seconds: default_reset_ttl(),
            verification_ttl_seconds: default_verification_ttl(),
            issuer: default_issuer(),
            audience: default_audience(),
            algorithm: default_algorithm(),
            enable_refresh: true,
            enable_revocation: true,
            max_active_tokens: default_max_active_tokens(),
            api_ttl_multiplier: default_api_ttl_multiplier(),
            private_key_pem: None,
            public_key_pem: None,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl TokenSettings {
    /// Create settings with the given secret and defaults for everything else
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_ttl_seconds = minutes * 60;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_ttl_seconds = days * 86400;
        self
    }

    /// Check if using the built-in development secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

fn default_access_ttl() -> i64 {
    900 // 15 minutes
}

fn default_refresh_ttl() -> i64 {
    604800 // 7 days
}

fn default_reset_ttl() -> i64 {
    3600
}

fn default_verification_ttl() -> i64 {
    86400
}

fn default_issuer() -> String {
    String::from("tokenlife")
}

fn default_audience() -> String {
    String::from("tokenlife-api")
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_true() -> bool {
    true
}

fn default_max_active_tokens() -> usize {
    10
}

fn default_api_ttl_multiplier() -> i32 {
    24
}

fn default_sweep_interval() -> u64 {
    300
}
