//! Tests for signing key generation and loading

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::errors::{DomainError, TokenError};
use crate::services::token::{KeySource, SigningKey, TokenService, TokenServiceConfig};

#[test]
fn test_generate_default_key() {
    let key = SigningKey::generate(256).unwrap();
    assert_eq!(key.bits(), 256);

    let key = SigningKey::generate(512).unwrap();
    assert_eq!(key.bits(), 512);
}

#[test]
fn test_generated_keys_differ() {
    let config = TokenServiceConfig::default();
    let first = TokenService::with_key(SigningKey::generate(256).unwrap(), config.clone()).unwrap();
    let second = TokenService::with_key(SigningKey::generate(256).unwrap(), config).unwrap();

    let token = first.issue("alice", 1).unwrap();
    assert_eq!(
        second.extract_subject(&token).unwrap_err(),
        DomainError::Token(TokenError::InvalidSignature)
    );
}

#[test]
fn test_generate_rejects_bad_sizes() {
    for bits in [0, 128, 255, 260] {
        assert!(
            matches!(SigningKey::generate(bits), Err(DomainError::Validation { .. })),
            "{bits} bits accepted"
        );
    }
}

#[test]
fn test_from_base64_round_trip_verifies() {
    let secret = BASE64.encode([42u8; 32]);
    let issuer = TokenService::with_key(
        SigningKey::from_base64(&secret, 256).unwrap(),
        TokenServiceConfig::default(),
    )
    .unwrap();
    let verifier = TokenService::with_key(
        SigningKey::from_bytes(&[42u8; 32], 256).unwrap(),
        TokenServiceConfig::default(),
    )
    .unwrap();

    let token = issuer.issue("alice", 42).unwrap();
    assert!(verifier.validate(&token, "alice").unwrap());
}

#[test]
fn test_from_base64_rejects_short_or_invalid_secret() {
    let short = BASE64.encode([1u8; 16]);
    assert!(matches!(
        SigningKey::from_base64(&short, 256),
        Err(DomainError::Token(TokenError::InvalidSigningKey { .. }))
    ));

    assert!(matches!(
        SigningKey::from_base64("%%%", 256),
        Err(DomainError::Token(TokenError::InvalidSigningKey { .. }))
    ));

    let medium = BASE64.encode([1u8; 40]);
    assert!(matches!(
        SigningKey::from_base64(&medium, 512),
        Err(DomainError::Token(TokenError::InvalidSigningKey { .. }))
    ));
}

#[test]
fn test_from_source() {
    let ephemeral = SigningKey::from_source(&KeySource::Ephemeral, 256).unwrap();
    assert_eq!(ephemeral.bits(), 256);

    let injected = SigningKey::from_source(
        &KeySource::Base64Secret(BASE64.encode([9u8; 48])),
        256,
    )
    .unwrap();
    assert_eq!(injected.bits(), 384);
}

#[test]
fn test_key_debug_is_redacted() {
    let key = SigningKey::from_bytes(&[0xAB; 32], 256).unwrap();
    let debug = format!("{:?}", key);

    assert_eq!(debug, "SigningKey { bits: 256, .. }");
}
