//! Tests for forged, tampered and oddly-shaped tokens

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::errors::{DomainError, TokenError};
use crate::services::token::{SigningKey, TokenService, TokenServiceConfig};

const RAW_KEY: [u8; 32] = [7u8; 32];

fn create_test_service() -> TokenService {
    let key = SigningKey::from_bytes(&RAW_KEY, 256).unwrap();
    TokenService::with_key(key, TokenServiceConfig::default()).unwrap()
}

fn token_error(result: Result<bool, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(err)) => err,
        other => panic!("expected token error, got {:?}", other),
    }
}

#[test]
fn test_every_tampered_character_is_rejected() {
    let service = create_test_service();
    let token = service.issue("alice", 42).unwrap();

    for (i, c) in token.char_indices() {
        if c == '.' {
            continue;
        }
        let replacement = if c == 'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(i..i + 1, &replacement.to_string());

        let err = token_error(service.validate(&tampered, "alice"));
        assert!(
            err.is_attack_signal(),
            "position {} produced {:?}",
            i,
            err
        );
    }
}

#[test]
fn test_payload_swap_breaks_signature() {
    let service = create_test_service();
    let alice = service.issue("alice", 42).unwrap();
    let mallory = service.issue("mallory", 666).unwrap();

    let alice_parts: Vec<&str> = alice.split('.').collect();
    let mallory_parts: Vec<&str> = mallory.split('.').collect();
    let spliced = format!("{}.{}.{}", alice_parts[0], mallory_parts[1], alice_parts[2]);

    assert_eq!(
        token_error(service.validate(&spliced, "mallory")),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_stripped_signature_is_rejected() {
    let service = create_test_service();
    let token = service.issue("alice", 42).unwrap();
    let unsigned = format!("{}.", &token[..token.rfind('.').unwrap()]);

    assert_eq!(
        token_error(service.validate(&unsigned, "alice")),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_other_hmac_algorithm_is_rejected() {
    let service = create_test_service();
    let claims = json!({"sub": "alice", "userId": 42, "iat": 0, "exp": i64::MAX / 2});
    let token = encode(
        &Header::new(Algorithm::HS384),
        &claims,
        &EncodingKey::from_secret(&RAW_KEY),
    )
    .unwrap();

    assert_eq!(
        token_error(service.validate(&token, "alice")),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_alg_none_is_rejected() {
    let service = create_test_service();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"alice","userId":42,"iat":0,"exp":9999999999}"#);
    let token = format!("{}.{}.", header, payload);

    assert!(token_error(service.validate(&token, "alice")).is_attack_signal());
}

#[test]
fn test_signed_payload_missing_user_id() {
    let service = create_test_service();
    let token = service
        .sign(&json!({"sub": "alice", "iat": 0, "exp": 10}))
        .unwrap();

    assert_eq!(service.extract_subject(&token).unwrap(), "alice");
    assert_eq!(
        service.extract_user_id(&token).unwrap_err(),
        DomainError::Token(TokenError::ClaimMissing {
            claim: "userId".to_string()
        })
    );
    assert!(matches!(
        service.extract_claims(&token),
        Err(DomainError::Token(TokenError::ClaimMissing { .. }))
    ));
}

#[test]
fn test_signed_payload_with_wrong_claim_types() {
    let service = create_test_service();
    let token = service
        .sign(&json!({"sub": "alice", "userId": "42", "iat": 0, "exp": "tomorrow"}))
        .unwrap();

    assert_eq!(
        service.extract_user_id(&token).unwrap_err(),
        DomainError::Token(TokenError::ClaimTypeMismatch {
            claim: "userId".to_string()
        })
    );
    assert_eq!(
        service.is_expired(&token).unwrap_err(),
        DomainError::Token(TokenError::ClaimTypeMismatch {
            claim: "exp".to_string()
        })
    );
    assert!(matches!(
        service.validate(&token, "alice"),
        Err(DomainError::Token(TokenError::ClaimTypeMismatch { .. }))
    ));
}

#[test]
fn test_signed_payload_without_expiry_cannot_validate() {
    let service = create_test_service();
    let token = service.sign(&json!({"sub": "alice", "userId": 1})).unwrap();

    assert_eq!(
        service.validate(&token, "alice").unwrap_err(),
        DomainError::Token(TokenError::ClaimMissing {
            claim: "exp".to_string()
        })
    );
}

#[test]
fn test_non_object_payload_is_malformed() {
    let service = create_test_service();
    let token = service.sign(&json!(["sub", "alice"])).unwrap();

    assert_eq!(
        token_error(service.validate(&token, "alice")),
        TokenError::MalformedToken
    );
}
