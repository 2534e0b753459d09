//! Main token service implementation

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, Header, Validation};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::entities::token::{
    read_integer, read_subject, read_timestamp, SessionClaims, TokenStatus, CLAIM_EXPIRES_AT,
    CLAIM_ISSUED_AT, CLAIM_USER_ID,
};
use crate::errors::{DomainError, TokenError};

use super::clock::{Clock, SystemClock};
use super::config::{KeySource, TokenServiceConfig};
use super::key_manager::SigningKey;

/// Signing algorithm for every session token
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Service for issuing and verifying signed session tokens
///
/// Holds its key, validation rules and clock immutably; every operation takes
/// `&self` and is safe to share across threads behind an `Arc`.
pub struct TokenService<C: Clock = SystemClock> {
    key: SigningKey,
    config: TokenServiceConfig,
    header: Header,
    validation: Validation,
    clock: C,
}

impl<C: Clock> std::fmt::Debug for TokenService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &self.key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenService<SystemClock> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` or an error if the configuration is invalid or
    /// the signing key cannot be produced
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let key = SigningKey::from_source(&config.key_source, config.key_bits)?;
        if config.key_source == KeySource::Ephemeral {
            tracing::warn!(
                key_bits = key.bits(),
                "Generated per-process signing key; issued tokens will not verify after a restart"
            );
        }

        Self::with_clock(key, config, SystemClock)
    }

    /// Creates a token service with an explicit signing key
    pub fn with_key(key: SigningKey, config: TokenServiceConfig) -> Result<Self, DomainError> {
        Self::with_clock(key, config, SystemClock)
    }
}

impl<C: Clock> TokenService<C> {
    /// Creates a token service with an explicit key and time source
    ///
    /// # Arguments
    ///
    /// * `key` - Signing key; must be at least `config.key_bits` long
    /// * `config` - Token service configuration
    /// * `clock` - Time source for issuance and expiry checks
    pub fn with_clock(
        key: SigningKey,
        config: TokenServiceConfig,
        clock: C,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        if key.bits() < config.key_bits {
            return Err(DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!(
                    "key is {} bits, configuration requires {}",
                    key.bits(),
                    config.key_bits
                ),
            }));
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry and claim presence are judged against our own clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        tracing::info!(
            key_bits = key.bits(),
            validity_secs = config.validity_window.num_seconds(),
            "Token service initialized"
        );

        Ok(Self {
            key,
            config,
            header: Header::new(ALGORITHM),
            validation,
            clock,
        })
    }

    /// Validity window applied to newly issued tokens
    pub fn validity_window(&self) -> Duration {
        self.config.validity_window
    }

    /// Time source used by this service
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Issues a signed session token
    ///
    /// # Arguments
    ///
    /// * `subject` - Username the token is issued to
    /// * `user_id` - Principal identifier
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact JWT (`header.payload.signature`)
    /// * `Err(DomainError)` - Empty subject, expiry out of range, or encoding failed
    pub fn issue(&self, subject: &str, user_id: i64) -> Result<String, DomainError> {
        if subject.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "subject must not be empty".to_string(),
            });
        }

        let claims = SessionClaims::new(
            subject,
            user_id,
            self.clock.now(),
            self.config.validity_window,
        )?;
        let token = self.sign(&claims)?;

        tracing::debug!(
            subject = %claims.sub,
            user_id = claims.user_id,
            exp = claims.exp,
            "Issued session token"
        );
        Ok(token)
    }

    /// Encodes and signs an arbitrary payload
    pub(crate) fn sign<T: Serialize>(&self, claims: &T) -> Result<String, DomainError> {
        encode(&self.header, claims, self.key.encoding_key())
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies the signature and decodes the payload in one step
    fn verified_payload(&self, token: &str) -> Result<Map<String, Value>, TokenError> {
        decode::<Map<String, Value>>(token, self.key.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::MalformedToken,
            })
    }

    /// Extracts the subject (username) from a verified token
    pub fn extract_subject(&self, token: &str) -> Result<String, DomainError> {
        let payload = self.verified_payload(token)?;
        Ok(read_subject(&payload)?)
    }

    /// Extracts the user id from a verified token
    pub fn extract_user_id(&self, token: &str) -> Result<i64, DomainError> {
        let payload = self.verified_payload(token)?;
        Ok(read_integer(&payload, CLAIM_USER_ID)?)
    }

    /// Extracts the expiry from a verified token
    pub fn extract_expiry(&self, token: &str) -> Result<DateTime<Utc>, DomainError> {
        let payload = self.verified_payload(token)?;
        Ok(read_timestamp(&payload, CLAIM_EXPIRES_AT)?)
    }

    /// Extracts the issue time from a verified token
    pub fn extract_issued_at(&self, token: &str) -> Result<DateTime<Utc>, DomainError> {
        let payload = self.verified_payload(token)?;
        Ok(read_timestamp(&payload, CLAIM_ISSUED_AT)?)
    }

    /// Extracts all session claims from a verified token
    pub fn extract_claims(&self, token: &str) -> Result<SessionClaims, DomainError> {
        let payload = self.verified_payload(token)?;
        Ok(SessionClaims::from_payload(&payload)?)
    }

    /// Checks a token against the identity the caller expects
    ///
    /// # Returns
    ///
    /// * `Ok(TokenStatus)` - Authentic token; valid, expired or issued to someone else
    /// * `Err(DomainError)` - Malformed token, bad signature or unusable claims
    pub fn check(&self, token: &str, expected_subject: &str) -> Result<TokenStatus, DomainError> {
        let payload = self.verified_payload(token)?;
        let subject = read_subject(&payload)?;
        let expires_at = read_timestamp(&payload, CLAIM_EXPIRES_AT)?;

        if !constant_time_eq(subject.as_bytes(), expected_subject.as_bytes()) {
            return Ok(TokenStatus::SubjectMismatch);
        }
        if self.clock.now() < expires_at {
            Ok(TokenStatus::Valid)
        } else {
            Ok(TokenStatus::Expired)
        }
    }

    /// Returns `true` iff the token is authentic, unexpired and issued to
    /// `expected_subject`
    ///
    /// Expiry and subject mismatch are `Ok(false)`; forged or malformed tokens
    /// are errors.
    pub fn validate(&self, token: &str, expected_subject: &str) -> Result<bool, DomainError> {
        Ok(self.check(token, expected_subject)?.is_valid())
    }

    /// Returns whether an authentic token is past its expiry
    pub fn is_expired(&self, token: &str) -> Result<bool, DomainError> {
        let expires_at = self.extract_expiry(token)?;
        Ok(expires_at <= self.clock.now())
    }

    /// Verifies a token and returns its claims, failing with `TokenExpired`
    /// once the session has run out
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, DomainError> {
        let claims = self.extract_claims(token)?;
        // Rejects timestamps chrono cannot represent
        claims.expires_at()?;
        if claims.is_expired_at(self.clock.now()) {
            return Err(DomainError::Token(TokenError::TokenExpired));
        }
        Ok(claims)
    }
}
