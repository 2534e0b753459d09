//! Token error taxonomy
//!
//! Structural and cryptographic failures are kept apart from expiry so callers
//! can tell an attack signal from a session that simply ran out.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing key generation failed")]
    KeyGenerationFailure,

    #[error("Invalid signing key: {reason}")]
    InvalidSigningKey { reason: String },

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Missing claim: {claim}")]
    ClaimMissing { claim: String },

    #[error("Claim has unexpected type: {claim}")]
    ClaimTypeMismatch { claim: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Whether the failure points at a forged or corrupted token rather than
    /// an ordinary expired session
    pub fn is_attack_signal(&self) -> bool {
        matches!(self, TokenError::MalformedToken | TokenError::InvalidSignature)
    }

    /// Whether the token was authentic but past its expiry
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::TokenExpired)
    }

    /// Whether the token itself was rejected (as opposed to a startup failure)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::MalformedToken
                | TokenError::InvalidSignature
                | TokenError::ClaimMissing { .. }
                | TokenError::ClaimTypeMismatch { .. }
                | TokenError::TokenExpired
        )
    }

    pub(crate) fn claim_missing(claim: &str) -> Self {
        TokenError::ClaimMissing {
            claim: claim.to_string(),
        }
    }

    pub(crate) fn claim_type_mismatch(claim: &str) -> Self {
        TokenError::ClaimTypeMismatch {
            claim: claim.to_string(),
        }
    }
}
