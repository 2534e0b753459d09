//! Unit tests for the token error taxonomy

use crate::errors::{DomainError, TokenError};

#[test]
fn test_attack_signals_are_distinct_from_expiry() {
    assert!(TokenError::InvalidSignature.is_attack_signal());
    assert!(TokenError::MalformedToken.is_attack_signal());
    assert!(!TokenError::TokenExpired.is_attack_signal());

    assert!(TokenError::TokenExpired.is_expired());
    assert!(!TokenError::InvalidSignature.is_expired());
}

#[test]
fn test_rejections_exclude_startup_failures() {
    assert!(TokenError::claim_missing("userId").is_rejection());
    assert!(TokenError::claim_type_mismatch("exp").is_rejection());
    assert!(!TokenError::KeyGenerationFailure.is_rejection());
    assert!(!TokenError::TokenGenerationFailed.is_rejection());
}

#[test]
fn test_error_messages_name_the_claim() {
    assert_eq!(
        TokenError::claim_missing("userId").to_string(),
        "Missing claim: userId"
    );
    assert_eq!(
        TokenError::claim_type_mismatch("sub").to_string(),
        "Claim has unexpected type: sub"
    );
}

#[test]
fn test_domain_error_bridges_token_error() {
    let err: DomainError = TokenError::InvalidSignature.into();
    assert_eq!(err.to_string(), "Invalid signature");
    assert_eq!(err.as_token_error(), Some(&TokenError::InvalidSignature));

    let err = DomainError::Validation {
        message: "subject must not be empty".to_string(),
    };
    assert!(err.as_token_error().is_none());
}
