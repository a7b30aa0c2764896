//! Integration tests for bearer token validation
//!
//! Forged tokens come from `TestTokenBuilder`, so each case isolates exactly
//! one failing check.

use jsonwebtoken::Algorithm;
use jwt_auth::validator::{bearer_token, validate_token, TokenValidationError};
use jwt_auth::{DefaultTokenValidator, JwtTokenGenerator, TokenGenerator, TokenValidator};
use jwt_auth_test_utils::*;
use std::sync::Arc;

fn validate(token: &str) -> jwt_auth::ValidationResult {
    let options = test_token_options();
    DefaultTokenValidator::new().validate(token, Some(options.as_ref()))
}

#[test]
fn test_forged_token_with_fixture_key_is_valid() {
    let token = TestTokenBuilder::new().for_user("alice").build();
    let result = validate(&token);
    assert!(result.is_valid(), "unexpected result: {result:?}");
}

#[test]
fn test_hs384_token_reports_algorithm_mismatch() {
    let token = TestTokenBuilder::new()
        .with_algorithm(Algorithm::HS384)
        .build();
    let result = validate(&token);

    assert!(!result.is_valid());
    assert_eq!(result.reason(), "Signing algorithm does not match");
}

#[test]
fn test_hs512_token_reports_algorithm_mismatch() {
    let token = TestTokenBuilder::new()
        .with_algorithm(Algorithm::HS512)
        .build();
    assert_eq!(
        validate(&token).reason(),
        "Signing algorithm does not match"
    );
}

#[test]
fn test_wrong_key_fails_signature() {
    let token = TestTokenBuilder::new()
        .signed_with_key(OTHER_SIGNING_KEY)
        .build();
    let result = validate(&token);

    assert!(!result.is_valid());
    assert_eq!(
        result.reason(),
        TokenValidationError::InvalidSignature.to_string()
    );
}

#[test]
fn test_wrong_issuer_fails() {
    let token = TestTokenBuilder::new().with_issuer("Someone.Else").build();
    assert_eq!(
        validate(&token).reason(),
        TokenValidationError::InvalidIssuer.to_string()
    );
}

#[test]
fn test_wrong_audience_fails() {
    let token = TestTokenBuilder::new()
        .with_audience("Someone.Else")
        .build();
    assert_eq!(
        validate(&token).reason(),
        TokenValidationError::InvalidAudience.to_string()
    );
}

#[test]
fn test_missing_issuer_fails() {
    let token = TestTokenBuilder::new().without_issuer().build();
    assert!(!validate(&token).is_valid());
}

#[test]
fn test_expired_token_fails() {
    let token = TestTokenBuilder::new().expired().build();
    assert_eq!(
        validate(&token).reason(),
        TokenValidationError::Expired.to_string()
    );
}

#[test]
fn test_token_without_expiry_fails() {
    let token = TestTokenBuilder::new().without_expiry().build();
    let result = validate(&token);

    assert!(!result.is_valid());
    assert!(result.reason().contains("exp"), "result: {result:?}");
}

#[test]
fn test_not_yet_valid_token_fails() {
    let token = TestTokenBuilder::new().not_before_in(120).build();
    assert_eq!(
        validate(&token).reason(),
        TokenValidationError::NotYetValid.to_string()
    );
}

#[test]
fn test_every_signature_byte_matters() -> Result<(), anyhow::Error> {
    let options = test_token_options();
    let generator = JwtTokenGenerator::new(Arc::clone(&options));
    let token = generator.generate_access_token("alice", &[])?;
    let (signed_part, signature) = token.rsplit_once('.').expect("token has a signature");
    let validator = DefaultTokenValidator::new();

    // The last character of an HS256 signature carries padding bits, so
    // flip only the full-byte positions.
    for position in 0..signature.len() - 1 {
        let mut chars: Vec<char> = signature.chars().collect();
        chars[position] = if chars[position] == 'A' { 'B' } else { 'A' };
        let tampered_signature: String = chars.into_iter().collect();
        let tampered = format!("{signed_part}.{tampered_signature}");

        let result = validator.validate(&tampered, Some(options.as_ref()));
        assert!(!result.is_valid(), "tamper at {position} accepted");
    }

    Ok(())
}

#[test]
fn test_missing_options_reason() {
    let token = TestTokenBuilder::new().build();
    let result = DefaultTokenValidator::new().validate(&token, None);
    assert_eq!(result.reason(), "TokenOptions cannot be null");
}

#[test]
fn test_blank_input_reason() {
    for input in ["", "   ", "\t\n"] {
        let result = validate(input);
        assert_eq!(
            result.reason(),
            "Input JWT cannot be null, empty or white space"
        );
    }
}

#[test]
fn test_validate_token_returns_claims() {
    let token = TestTokenBuilder::new()
        .for_user("alice")
        .with_claim("tenant", "acme")
        .build();

    let data = validate_token(&token, &test_token_options().to_validation_parameters())
        .expect("token should validate");
    assert_eq!(data.claims["tenant"], "acme");
    assert_eq!(data.claims["sub"], "alice");
}

#[test]
fn test_bearer_header_round_trip() {
    let token = TestTokenBuilder::new().build();
    let header = format!("Bearer {token}");

    let extracted = bearer_token(&header).expect("bearer token present");
    assert!(validate(extracted).is_valid());
}
