//! Application factory

use actix_web::{
    error::{InternalError, JsonPayloadError},
    web, App, HttpRequest, HttpResponse,
};

use tl_shared::error_codes;

use crate::dto::ErrorResponse;
use crate::routes::health::health_check;
use crate::routes::tokens::{self, AppState};

/// Create and configure the application
///
/// The caller wraps request logging.
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(tokens::configure))
        .default_service(web::route().to(not_found))
}

/// Unreadable JSON bodies become 400 with an `ErrorResponse`
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
