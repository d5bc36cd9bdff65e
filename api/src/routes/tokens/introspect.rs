use actix_web::{web, HttpResponse};

use crate::dto::{IntrospectResponse, TokenRequest};
use crate::handlers::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/tokens/introspect
///
/// Describes a token, including revoked and expired ones. Fails only when
/// the token cannot be decoded.
pub async fn introspect(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> HttpResponse {
    match state.token_service.inspect(&request.token).await {
        Ok(info) => HttpResponse::Ok().json(IntrospectResponse::from(info)),
        Err(error) => handle_domain_error(&error),
    }
}
