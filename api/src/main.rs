use actix_web::{middleware::Logger, web, HttpServer};
use log::info;

use tl_api::app::create_app;
use tl_api::config::{build_token_service, init_logging, start_sweeper};
use tl_api::routes::tokens::AppState;
use tl_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    info!("Starting TokenLife API Server ({})", config.environment);

    let token_service = build_token_service(&config)?;
    let _sweeper = start_sweeper(&token_service, &config);
    let app_state = web::Data::new(AppState::new(token_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()).wrap(Logger::default()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
