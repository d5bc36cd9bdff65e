//! Request and response bodies of the token endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tl_core::TokenInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Body of the revoke and introspect endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub revoked: bool,
}

/// Introspection result; `active` is false for revoked or expired tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectResponse {
    pub active: bool,

    #[serde(flatten)]
    pub info: TokenInfo,
}

impl From<TokenInfo> for IntrospectResponse {
    fn from(info: TokenInfo) -> Self {
        Self {
            active: info.is_active(),
            info,
        }
    }
}

/// The authenticated subject behind a Bearer access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub subject_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub token_id: String,

    pub expires_at: DateTime<Utc>,
}
