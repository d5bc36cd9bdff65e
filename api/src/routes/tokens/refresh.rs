use actix_web::{web, HttpResponse};

use crate::dto::RefreshTokenRequest;
use crate::handlers::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/tokens/refresh
///
/// Exchanges a refresh token for a new access token. The refresh token in
/// the response is the one presented; it is not rotated.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "bearer",
///     "expires_in": 900,
///     "expires_at": "2024-01-01T00:15:00Z"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Malformed, forged, expired, revoked or non-refresh token
/// - 404 Not Found: Refresh is disabled
pub async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    match state.token_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(error) => handle_domain_error(&error),
    }
}
