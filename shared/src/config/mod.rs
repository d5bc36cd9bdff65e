//! Configuration module
//!
//! - `auth` - token signing and lifecycle settings
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::TokenSettings;
pub use environment::{Environment, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tokens: TokenSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            tokens: TokenSettings::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration in layers: built-in defaults, then the optional
    /// `config/<environment>.toml` file, then `TL__`-prefixed environment
    /// variables (e.g. `TL__TOKENS__SECRET`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let environment = Environment::from_env();
        Self::load_from(environment, environment.config_file())
    }

    /// Same as [`AppConfig::load`] with an explicit file base name
    pub fn load_from(environment: Environment, file: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Self::for_environment(environment))?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("TL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
