//! Maps engine errors onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use tl_core::{DomainError, TokenError};
use tl_shared::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(token_error) => match token_error {
            TokenError::InsufficientScope { .. } => StatusCode::FORBIDDEN,
            TokenError::FeatureDisabled { .. } => StatusCode::NOT_FOUND,
            TokenError::TokenGenerationFailed | TokenError::KeyLoadError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            e if e.is_authentication_failure() => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

fn error_body(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
        }
        DomainError::Internal { .. } => {
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
        }
        DomainError::Token(
            TokenError::TokenGenerationFailed | TokenError::KeyLoadError { .. },
        ) => ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        DomainError::Token(token_error) => ErrorResponse::from(token_error),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("Domain Error: {:?}", error);
    } else {
        log::debug!("Request rejected: {}", error);
    }

    error_body(error).to_response(status)
}

/// Error type for extractors, rendered as an `ErrorResponse`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Unauthorized(String),
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => status_for(error),
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Domain(error) => handle_domain_error(error),
            ApiError::Unauthorized(message) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, message.clone())
                    .to_response(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (TokenError::MalformedToken.into(), StatusCode::UNAUTHORIZED),
            (TokenError::InvalidSignature.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenRevoked.into(), StatusCode::UNAUTHORIZED),
            (
                TokenError::InvalidToken { reason: "wrong type".to_string() }.into(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                TokenError::InsufficientScope { scope: "write".to_string() }.into(),
                StatusCode::FORBIDDEN,
            ),
            (
                TokenError::FeatureDisabled { feature: "refresh".to_string() }.into(),
                StatusCode::NOT_FOUND,
            ),
            (TokenError::TokenGenerationFailed.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                DomainError::Validation { message: "empty subject".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Internal { message: "store offline".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_for(&error), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let body = error_body(&DomainError::Internal {
            message: "connection refused".to_string(),
        });
        assert_eq!(body.error, "INTERNAL_ERROR");
        assert!(!body.message.contains("connection refused"));
    }

    #[test]
    fn test_token_error_code_in_body() {
        let body = error_body(&TokenError::TokenRevoked.into());
        assert_eq!(body.error, "TOKEN_REVOKED");
    }
}
