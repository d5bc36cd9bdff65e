//! Token route handlers
//!
//! - Refresh an access token
//! - Revoke a token
//! - Introspect a token
//! - Describe the caller of a Bearer access token

pub mod introspect;
pub mod me;
pub mod refresh;
pub mod revoke;

use actix_web::web;

use crate::config::SharedTokenService;

/// Application state shared across handlers
pub struct AppState {
    pub token_service: SharedTokenService,
}

impl AppState {
    pub fn new(token_service: SharedTokenService) -> Self {
        Self { token_service }
    }
}

/// Register the `/tokens` scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tokens")
            .route("/refresh", web::post().to(refresh::refresh))
            .route("/revoke", web::post().to(revoke::revoke))
            .route("/introspect", web::post().to(introspect::introspect))
            .route("/me", web::get().to(me::me)),
    );
}
