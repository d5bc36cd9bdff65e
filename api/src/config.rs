//! Runtime wiring: logging and the token service built from `AppConfig`

use std::sync::Arc;

use anyhow::{bail, Context};
use log::warn;
use tokio::task::JoinHandle;

use tl_core::{
    InMemoryRevocationStore, RevocationSweeper, SweeperConfig, TokenService, TokenServiceConfig,
};
use tl_shared::{AppConfig, LoggingConfig};

/// Token service shared by every worker
pub type SharedTokenService = Arc<TokenService<InMemoryRevocationStore>>;

/// Initialize env_logger; `RUST_LOG` overrides the configured level
pub fn init_logging(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::new().default_filter_or(config.level.as_str()),
    );
    if !config.timestamp {
        builder.format_timestamp(None);
    }
    // A second init (tests) keeps the first logger
    let _ = builder.try_init();
}

/// Build the token service, refusing the development secret in production
pub fn build_token_service(config: &AppConfig) -> anyhow::Result<SharedTokenService> {
    if config.tokens.is_using_default_secret() {
        if config.environment.is_production() {
            bail!("TL__TOKENS__SECRET must be set in production");
        }
        warn!("Using the built-in development token secret");
    }

    let token_config = TokenServiceConfig::from_settings(&config.tokens)
        .context("invalid token configuration")?;
    let service = TokenService::in_memory(token_config).context("failed to load signing keys")?;

    Ok(Arc::new(service))
}

/// Spawn the periodic revocation sweep; `None` when disabled
pub fn start_sweeper(service: &SharedTokenService, config: &AppConfig) -> Option<JoinHandle<()>> {
    let sweeper = RevocationSweeper::new(
        service.store(),
        SweeperConfig::from_settings(&config.tokens),
    );
    Arc::new(sweeper).start_background_task()
}
