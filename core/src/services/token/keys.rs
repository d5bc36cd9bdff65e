//! Signing key material for the configured algorithm

use std::fs;
use std::path::Path;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Encoding and decoding keys bound to one algorithm
#[derive(Clone)]
pub struct SigningKeys {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SigningKeys {
    /// Builds keys from a token service configuration
    ///
    /// HMAC algorithms use the shared secret, every other algorithm the PEM
    /// pair.
    pub fn from_config(config: &TokenServiceConfig) -> Result<Self, DomainError> {
        match (&config.private_key_pem, &config.public_key_pem) {
            _ if config.is_hmac() => Ok(Self::hmac(config.algorithm, &config.secret)),
            (Some(private_pem), Some(public_pem)) => {
                Self::from_pem_strings(config.algorithm, private_pem, public_pem)
            }
            _ => Err(key_error(format!(
                "{:?} requires PEM key configuration",
                config.algorithm
            ))),
        }
    }

    /// Symmetric keys from a shared secret
    pub fn hmac(algorithm: Algorithm, secret: &[u8]) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Asymmetric keys from PEM strings
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKeys)` - Keys parsed successfully
    /// * `Err(DomainError)` - The algorithm is HMAC or a key is not valid PEM
    pub fn from_pem_strings(
        algorithm: Algorithm,
        private_key_pem: &str,
        public_key_pem: &str,
    ) -> Result<Self, DomainError> {
        let private_pem = private_key_pem.as_bytes();
        let public_pem = public_key_pem.as_bytes();

        let (encoding_key, decoding_key) = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => (
                EncodingKey::from_rsa_pem(private_pem),
                DecodingKey::from_rsa_pem(public_pem),
            ),
            Algorithm::ES256 | Algorithm::ES384 => (
                EncodingKey::from_ec_pem(private_pem),
                DecodingKey::from_ec_pem(public_pem),
            ),
            Algorithm::EdDSA => (
                EncodingKey::from_ed_pem(private_pem),
                DecodingKey::from_ed_pem(public_pem),
            ),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(key_error(format!(
                    "{:?} uses a shared secret, not PEM keys",
                    algorithm
                )));
            }
        };

        Ok(Self {
            algorithm,
            encoding_key: encoding_key
                .map_err(|e| key_error(format!("Invalid private key format: {}", e)))?,
            decoding_key: decoding_key
                .map_err(|e| key_error(format!("Invalid public key format: {}", e)))?,
        })
    }

    /// Asymmetric keys from PEM files
    pub fn from_pem_files<P: AsRef<Path>>(
        algorithm: Algorithm,
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, DomainError> {
        let private_pem = fs::read_to_string(private_key_path.as_ref())
            .map_err(|e| key_error(format!("Failed to read private key: {}", e)))?;
        let public_pem = fs::read_to_string(public_key_path.as_ref())
            .map_err(|e| key_error(format!("Failed to read public key: {}", e)))?;

        Self::from_pem_strings(algorithm, &private_pem, &public_pem)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

fn key_error(message: String) -> DomainError {
    DomainError::Token(TokenError::KeyLoadError { message })
}
