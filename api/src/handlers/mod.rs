pub mod error_handler;

pub use error_handler::{handle_domain_error, status_for, ApiError};
