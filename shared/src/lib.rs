//! Shared configuration and response types for the TokenLife workspace
//!
//! - Configuration types loaded from files and the environment
//! - The error response body used by the HTTP layer

pub mod config;
pub mod errors;

pub use config::{AppConfig, Environment, LoggingConfig, ServerConfig, TokenSettings};
pub use errors::{error_codes, ErrorResponse};
