//! Token lifecycle services.

pub mod token;

pub use token::{
    RevocationSweeper, SigningKeys, SweepResult, SweeperConfig, TokenCodec, TokenIssuer,
    TokenService, TokenServiceConfig, TokenValidator,
};
