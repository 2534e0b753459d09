//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Default session validity window in seconds (30 hours)
pub const DEFAULT_VALIDITY_WINDOW_SECS: i64 = 30 * 60 * 60;

/// Default HMAC key size in bits
pub const DEFAULT_KEY_BITS: usize = 256;

/// JWT session token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret shared across instances.
    ///
    /// When absent, a fresh key is generated at startup and every token
    /// issued before a restart stops verifying.
    #[serde(default)]
    pub secret: Option<String>,

    /// How long an issued session token stays valid, in seconds
    #[serde(default = "default_validity_window_secs")]
    pub validity_window_secs: i64,

    /// Size of the HMAC-SHA256 signing key in bits
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            validity_window_secs: default_validity_window_secs(),
            key_bits: default_key_bits(),
        }
    }
}

impl JwtConfig {
    /// Create a configuration that signs with a shared base64 secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Set the validity window in hours
    pub fn with_validity_hours(mut self, hours: i64) -> Self {
        self.validity_window_secs = hours.saturating_mul(3600);
        self
    }

    /// Set the validity window in seconds
    pub fn with_validity_secs(mut self, secs: i64) -> Self {
        self.validity_window_secs = secs;
        self
    }

    /// Set the signing key size in bits
    pub fn with_key_bits(mut self, bits: usize) -> Self {
        self.key_bits = bits;
        self
    }

    /// Whether tokens are signed with a per-process key
    pub fn is_ephemeral(&self) -> bool {
        self.secret.is_none()
    }

    /// Create from environment variables
    ///
    /// - `JWT_SECRET`: base64 secret (optional)
    /// - `JWT_VALIDITY_WINDOW_SECS`: validity window (default 108000)
    /// - `JWT_KEY_BITS`: key size (default 256)
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let validity_window_secs = std::env::var("JWT_VALIDITY_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_validity_window_secs);
        let key_bits = std::env::var("JWT_KEY_BITS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_key_bits);

        Self {
            secret,
            validity_window_secs,
            key_bits,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
        }
    }

    /// Get validity window in seconds
    pub fn validity_window_seconds(&self) -> i64 {
        self.jwt.validity_window_secs
    }
}

fn default_validity_window_secs() -> i64 {
    DEFAULT_VALIDITY_WINDOW_SECS
}

fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}
