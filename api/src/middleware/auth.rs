//! Bearer token authentication.
//!
//! `AuthContext` is an extractor: a handler that takes one only runs when the
//! request carries a valid access token in its Authorization header. Any
//! other token class, or a revoked or expired access token, is rejected with
//! 401 and the engine's error code.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;

use tl_core::{DomainError, TokenClaims};

use crate::handlers::ApiError;
use crate::routes::tokens::AppState;

/// Authenticated subject injected into handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject_id: String,
    pub email: Option<String>,
    /// `jti` of the presented access token
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            expires_at: claims.expires_at(),
            subject_id: claims.sub,
            email: claims.email,
            token_id: claims.jti,
        }
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = extract_bearer_token(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                ApiError::from(DomainError::Internal {
                    message: "token service is not configured".to_string(),
                })
            })?;
            let token = token.ok_or_else(|| {
                ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

            let claims = state
                .token_service
                .validate_access(&token)
                .await
                .map_err(ApiError::from)?;

            Ok(AuthContext::from_claims(claims))
        })
    }
}
