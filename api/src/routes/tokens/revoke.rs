use actix_web::{web, HttpResponse};

use crate::dto::{RevokeResponse, TokenRequest};
use crate::handlers::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/tokens/revoke
///
/// Revokes any token signed by this service until its natural expiry.
/// Revoking an expired token succeeds.
///
/// ## Errors
/// - 401 Unauthorized: Malformed or forged token
/// - 404 Not Found: Revocation is disabled
pub async fn revoke(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> HttpResponse {
    match state.token_service.revoke(&request.token).await {
        Ok(()) => HttpResponse::Ok().json(RevokeResponse { revoked: true }),
        Err(error) => handle_domain_error(&error),
    }
}
