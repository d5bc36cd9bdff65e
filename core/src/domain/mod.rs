//! Domain layer containing the token entities.

pub mod entities;

pub use entities::{
    normalize_scopes, require_scope, ApiToken, TokenClaims, TokenInfo, TokenPair, TokenType,
    BEARER_TOKEN_TYPE, DEFAULT_API_TOKEN_NAME, DEFAULT_AUDIENCE, DEFAULT_ISSUER,
};
