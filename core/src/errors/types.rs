//! Token error taxonomy
//!
//! Every failure is terminal for the call that produced it. The engine never
//! retries: signature and state-lookup failures are not transient.

use thiserror::Error;
use tl_shared::{error_codes, ErrorResponse};

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Structurally invalid input or a missing required claim
    #[error("Malformed token")]
    MalformedToken,

    /// Signature does not verify, or the header names a different algorithm
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    /// Well-formed and unexpired, but not acceptable for this operation
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Insufficient scope: {scope}")]
    InsufficientScope { scope: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Feature disabled: {feature}")]
    FeatureDisabled { feature: String },

    #[error("Key load error: {message}")]
    KeyLoadError { message: String },
}

impl TokenError {
    /// Stable client-facing error code
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::MalformedToken => error_codes::TOKEN_MALFORMED,
            TokenError::InvalidSignature => error_codes::TOKEN_SIGNATURE_INVALID,
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::TokenRevoked => error_codes::TOKEN_REVOKED,
            TokenError::InvalidToken { .. } => error_codes::TOKEN_INVALID,
            TokenError::InsufficientScope { .. } => error_codes::INSUFFICIENT_SCOPE,
            TokenError::FeatureDisabled { .. } => error_codes::FEATURE_DISABLED,
            TokenError::TokenGenerationFailed | TokenError::KeyLoadError { .. } => {
                error_codes::INTERNAL_ERROR
            }
        }
    }

    /// Whether the failure means "authenticate again" rather than a server fault
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TokenError::MalformedToken
                | TokenError::InvalidSignature
                | TokenError::TokenExpired
                | TokenError::TokenRevoked
                | TokenError::InvalidToken { .. }
        )
    }

    pub(crate) fn wrong_type(expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> Self {
        TokenError::InvalidToken {
            reason: format!("expected {} token, got {}", expected, actual),
        }
    }
}

impl From<&TokenError> for ErrorResponse {
    fn from(error: &TokenError) -> Self {
        ErrorResponse::new(error.error_code(), error.to_string())
    }
}
