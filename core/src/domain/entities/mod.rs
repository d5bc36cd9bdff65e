//! Domain entities.

pub mod token;

pub use token::{
    normalize_scopes, require_scope, ApiToken, TokenClaims, TokenInfo, TokenPair, TokenType,
    BEARER_TOKEN_TYPE, DEFAULT_API_TOKEN_NAME, DEFAULT_AUDIENCE, DEFAULT_ISSUER,
};
