//! Claims codec: compact signed token <-> [`TokenClaims`]
//!
//! Tokens are three base64url segments (header, payload, signature) joined by
//! `.`. The codec checks structure and signature only. Expiry, issuer,
//! audience and revocation belong to the validator.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{error, warn};

use crate::domain::entities::token::TokenClaims;
use crate::errors::TokenError;

use super::keys::SigningKeys;

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Signs and verifies tokens with one algorithm and key set
#[derive(Debug)]
pub struct TokenCodec {
    keys: SigningKeys,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(keys: SigningKeys) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Self { keys, validation }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.keys.algorithm()
    }

    /// Serializes and signs `claims`.
    ///
    /// Only serialization or signing failures are reported; the content of the
    /// claims is the caller's responsibility.
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm());
        encode(&header, claims, self.keys.encoding_key()).map_err(|e| {
            error!("Failed to sign {} token: {}", claims.token_type, e);
            TokenError::TokenGenerationFailed
        })
    }

    /// Parses `token`, pins its algorithm and verifies its signature.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenClaims)` - Signature verified and claims extracted
    /// * `Err(TokenError::MalformedToken)` - Bad structure or missing claims
    /// * `Err(TokenError::InvalidSignature)` - Wrong algorithm or signature
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut segments = token.split('.');
        let (header, payload) = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
            {
                (header, payload)
            }
            _ => return Err(TokenError::MalformedToken),
        };

        let header: RawHeader = decode_segment(header)?;
        decode_segment::<serde_json::Map<String, serde_json::Value>>(payload)?;

        // Per-token pinning: "none" and algorithm substitution never reach
        // signature verification.
        match header.alg.parse::<Algorithm>() {
            Ok(alg) if alg == self.algorithm() => {}
            _ => {
                warn!(
                    "Rejected token signed with {:?}, expected {:?}",
                    header.alg,
                    self.algorithm()
                );
                return Err(TokenError::InvalidSignature);
            }
        }

        decode::<TokenClaims>(token, self.keys.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                // Header and payload decoded above, so a base64 failure here
                // is in the signature segment.
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm | ErrorKind::Base64(_) => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::MalformedToken,
            })
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::MalformedToken)
}
