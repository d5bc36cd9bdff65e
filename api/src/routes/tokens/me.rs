use actix_web::HttpResponse;

use crate::dto::MeResponse;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/tokens/me
///
/// Requires `Authorization: Bearer {access_token}`.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        subject_id: auth.subject_id,
        email: auth.email,
        token_id: auth.token_id,
        expires_at: auth.expires_at,
    })
}
