//! Configuration for the token service

use chrono::Duration;
use sh_shared::config::JwtConfig;

use crate::errors::DomainError;

/// Smallest accepted HMAC-SHA256 key size
pub const MIN_KEY_BITS: usize = 256;

/// Longest accepted validity window, in seconds (one year)
pub const MAX_VALIDITY_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

/// Where the signing key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Fresh random key per process; tokens do not survive a restart
    Ephemeral,
    /// Standard base64 secret injected from configuration
    Base64Secret(String),
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Ephemeral => f.write_str("Ephemeral"),
            KeySource::Base64Secret(_) => f.write_str("Base64Secret(<redacted>)"),
        }
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// How long an issued token stays valid
    pub validity_window: Duration,
    /// Signing key size in bits
    pub key_bits: usize,
    /// Signing key origin
    pub key_source: KeySource,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            validity_window: Duration::hours(30),
            key_bits: MIN_KEY_BITS,
            key_source: KeySource::Ephemeral,
        }
    }
}

impl TokenServiceConfig {
    /// Sets the validity window
    pub fn with_validity_window(mut self, validity_window: Duration) -> Self {
        self.validity_window = validity_window;
        self
    }

    /// Signs with a shared base64 secret instead of a per-process key
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.key_source = KeySource::Base64Secret(secret.into());
        self
    }

    /// Sets the signing key size
    pub fn with_key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    /// Checks the tunable parameters before any key material is touched
    pub fn validate(&self) -> Result<(), DomainError> {
        check_key_bits(self.key_bits)?;
        check_validity_secs(self.validity_window.num_seconds())
    }
}

fn check_validity_secs(secs: i64) -> Result<(), DomainError> {
    if secs > MAX_VALIDITY_WINDOW_SECS {
        return Err(DomainError::Validation {
            message: format!(
                "validity window must not exceed {} seconds, got {}",
                MAX_VALIDITY_WINDOW_SECS, secs
            ),
        });
    }
    if secs <= 0 {
        return Err(DomainError::Validation {
            message: "validity window must be positive".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_key_bits(bits: usize) -> Result<(), DomainError> {
    if bits < MIN_KEY_BITS || bits % 8 != 0 {
        return Err(DomainError::Validation {
            message: format!(
                "key size must be a multiple of 8 and at least {} bits, got {}",
                MIN_KEY_BITS, bits
            ),
        });
    }
    Ok(())
}

impl TryFrom<&JwtConfig> for TokenServiceConfig {
    type Error = DomainError;

    fn try_from(config: &JwtConfig) -> Result<Self, Self::Error> {
        // Bounded before conversion so `Duration::seconds` cannot overflow
        check_validity_secs(config.validity_window_secs)?;

        let key_source = match &config.secret {
            Some(secret) => KeySource::Base64Secret(secret.clone()),
            None => KeySource::Ephemeral,
        };
        Ok(Self {
            validity_window: Duration::seconds(config.validity_window_secs),
            key_bits: config.key_bits,
            key_source,
        })
    }
}
