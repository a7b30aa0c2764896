//! Integration tests for the issue, inspect and validate pipeline
//!
//! Covers a token from generation through claim inspection, principal
//! construction and bearer validation, using only the public API.

use jwt_auth::claims::claim_types;
use jwt_auth::parser::{get_claim_value, get_claims};
use jwt_auth::principal::create_principal;
use jwt_auth::ticket::TOKEN_NAME;
use jwt_auth::{
    Claim, ClaimsExt, DefaultTokenValidator, JwtTokenGenerator, TokenGenerator, TokenOptions,
    TokenValidator,
};
use jwt_auth_test_utils::*;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn sample_options() -> Arc<TokenOptions> {
    Arc::new(
        TokenOptions::new("Me", "Me2", b"abcdefghijklmnopqr12345").unwrap(),
    )
}

fn name_claims() -> Vec<Claim> {
    vec![
        Claim::new(claim_types::GIVEN_NAME, "FName"),
        Claim::new(claim_types::SURNAME, "LName"),
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_generated_token_principal_and_carrier() -> Result<(), anyhow::Error> {
    let generator = JwtTokenGenerator::new(sample_options());

    let generated =
        generator.generate_access_token_with_principal("username@org.com", &name_claims())?;

    let identity = generated
        .principal
        .identity()
        .expect("principal has an identity");
    let claims = identity.claims();
    assert!(identity.is_authenticated());
    assert_eq!(claims.claim_value(claim_types::GIVEN_NAME), Some("FName"));
    assert_eq!(claims.claim_value(claim_types::SURNAME), Some("LName"));
    assert_eq!(generated.principal.name(), Some("username@org.com"));

    let stored = generated.properties.token_value(TOKEN_NAME);
    assert!(stored.is_some_and(|t| !t.is_empty()));
    assert_eq!(stored, Some(generated.access_token.as_str()));

    Ok(())
}

#[test]
fn test_generate_then_validate() -> Result<(), anyhow::Error> {
    let options = sample_options();
    let generator = JwtTokenGenerator::new(Arc::clone(&options));
    let token = generator.generate_access_token("username@org.com", &name_claims())?;

    token
        .assert_valid_jwt()
        .assert_for_subject("username@org.com")
        .assert_has_claim(claim_types::GIVEN_NAME, "FName")
        .assert_has_claim("iss", "Me")
        .assert_has_claim("aud", "Me2")
        .assert_expires_in(300);

    let validator = DefaultTokenValidator::new();
    let result = validator.validate(&token, Some(options.as_ref()));
    assert!(result.is_valid(), "unexpected result: {result:?}");
    assert_eq!(result.reason(), "");

    Ok(())
}

#[test]
fn test_get_claims_reads_names_back() -> Result<(), anyhow::Error> {
    let generator = JwtTokenGenerator::new(sample_options());
    let token = generator.generate_access_token("username@org.com", &name_claims())?;

    let claims = get_claims(&token)?;

    assert_eq!(
        get_claim_value(&claims, claim_types::GIVEN_NAME),
        Some("FName")
    );
    assert_eq!(
        get_claim_value(&claims, claim_types::SURNAME),
        Some("LName")
    );
    assert_eq!(
        get_claim_value(&claims, claim_types::SUB),
        Some("username@org.com")
    );
    assert!(get_claim_value(&claims, claim_types::JTI).is_some());

    Ok(())
}

#[test]
fn test_get_claims_ignores_signature() -> Result<(), anyhow::Error> {
    let token = TestTokenBuilder::new()
        .signed_with_key(OTHER_SIGNING_KEY)
        .with_claim(claim_types::GIVEN_NAME, "FName")
        .with_claim(claim_types::SURNAME, "LName")
        .build();

    let claims = get_claims(&token)?;
    assert_eq!(
        get_claim_value(&claims, claim_types::GIVEN_NAME),
        Some("FName")
    );
    assert_eq!(
        get_claim_value(&claims, claim_types::SURNAME),
        Some("LName")
    );

    Ok(())
}

#[test]
fn test_parsed_claims_build_principal() -> Result<(), anyhow::Error> {
    let token = JwtTokenGenerator::new(sample_options()).generate_access_token(
        "username@org.com",
        &[
            Claim::new("Recipient", "reports"),
            Claim::new("Recipient", "billing"),
        ],
    )?;

    let principal = create_principal(get_claims(&token)?, None, None);

    assert!(principal.is_authenticated());
    assert_eq!(principal.name(), Some("username@org.com"));
    assert!(principal.is_in_role("reports"));
    assert!(principal.is_in_role("billing"));
    assert!(!principal.is_in_role("admin"));

    Ok(())
}

#[test]
fn test_every_token_gets_a_fresh_jti() -> Result<(), anyhow::Error> {
    let generator = JwtTokenGenerator::new(sample_options());
    let first = get_claims(&generator.generate_access_token("alice", &[])?)?;
    let second = get_claims(&generator.generate_access_token("alice", &[])?)?;

    assert_ne!(
        get_claim_value(&first, claim_types::JTI),
        get_claim_value(&second, claim_types::JTI)
    );

    Ok(())
}

#[test]
fn test_custom_expiry_is_honored() -> Result<(), anyhow::Error> {
    let options = Arc::new(TokenOptions::with_expiry(
        TEST_ISSUER,
        TEST_AUDIENCE,
        TEST_SIGNING_KEY,
        60,
    )?);
    let token = JwtTokenGenerator::new(options).generate_access_token("alice", &[])?;

    token.assert_expires_in(3600);

    Ok(())
}

#[test]
fn test_short_signing_key_is_rejected() {
    let result = TokenOptions::new(TEST_ISSUER, TEST_AUDIENCE, b"too-short-key");
    assert!(result.is_err());

    let result = TokenOptions::new(TEST_ISSUER, TEST_AUDIENCE, &TEST_SIGNING_KEY[..16]);
    assert!(result.is_ok());
}
