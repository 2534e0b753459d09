//! HMAC-SHA256 signing key for session tokens

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::{rngs::OsRng, RngCore};

use crate::errors::{DomainError, TokenError};

use super::config::{check_key_bits, KeySource, MIN_KEY_BITS};

/// Symmetric key used to sign and verify session tokens
///
/// Built once and never handed out: the raw bytes are only reachable through
/// the `jsonwebtoken` key wrappers inside this crate.
#[derive(Clone)]
pub struct SigningKey {
    /// Key for signing JWTs
    encoding_key: EncodingKey,
    /// Same secret, for verification
    decoding_key: DecodingKey,
    /// Key size in bits
    bits: usize,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Generates a fresh random key from the OS CSPRNG
    ///
    /// # Arguments
    ///
    /// * `bits` - Key size; a multiple of 8, at least 256
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Key generated
    /// * `Err(DomainError)` - Bad size, or the OS RNG failed (`KeyGenerationFailure`)
    pub fn generate(bits: usize) -> Result<Self, DomainError> {
        check_key_bits(bits)?;

        let mut bytes = vec![0u8; bits / 8];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "OS random number generator unavailable");
            DomainError::Token(TokenError::KeyGenerationFailure)
        })?;

        // Round-trip through the same encoding an injected secret uses
        let encoded = BASE64.encode(&bytes);
        Self::from_base64(&encoded, bits)
    }

    /// Loads a key from a standard base64 secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Base64-encoded key material
    /// * `min_bits` - Minimum acceptable key size
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Key loaded
    /// * `Err(DomainError)` - Secret is not base64 or is too short (`InvalidSigningKey`)
    pub fn from_base64(secret: &str, min_bits: usize) -> Result<Self, DomainError> {
        let bytes = BASE64.decode(secret.trim()).map_err(|e| {
            DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!("secret is not valid base64: {}", e),
            })
        })?;
        Self::from_bytes(&bytes, min_bits)
    }

    /// Wraps raw key bytes
    pub fn from_bytes(bytes: &[u8], min_bits: usize) -> Result<Self, DomainError> {
        let required = min_bits.max(MIN_KEY_BITS);
        let bits = bytes.len() * 8;
        if bits < required {
            return Err(DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!("key is {} bits, at least {} required", bits, required),
            }));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            bits,
        })
    }

    /// Resolves a configured key source
    pub fn from_source(source: &KeySource, bits: usize) -> Result<Self, DomainError> {
        match source {
            KeySource::Ephemeral => Self::generate(bits),
            KeySource::Base64Secret(secret) => Self::from_base64(secret, bits),
        }
    }

    /// Key size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}
