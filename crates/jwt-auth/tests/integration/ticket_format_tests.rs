//! Integration tests for the encrypted cookie ticket codec
//!
//! Tickets carry a JWT; these tests check that the codec only hands back
//! tickets whose embedded token still validates.

use jsonwebtoken::Algorithm;
use jwt_auth::claims::claim_types;
use jwt_auth::principal::create_principal;
use jwt_auth::ticket::{DEFAULT_AUTHENTICATION_SCHEME, TOKEN_NAME};
use jwt_auth::{
    AuthProperties, AuthenticationTicket, Claim, JwtTokenGenerator, SecureDataFormat,
    TokenGenerator,
};
use jwt_auth_test_utils::*;

const PURPOSE: &str = "jwt-auth-tests-Auth1";

fn ticket_carrying(token: &str) -> AuthenticationTicket {
    let mut properties = AuthProperties::new();
    properties.store_token(TOKEN_NAME, token);
    AuthenticationTicket::new(
        create_principal(vec![Claim::new(claim_types::NAME, "alice")], None, None),
        properties,
        DEFAULT_AUTHENTICATION_SCHEME,
    )
}

#[test]
fn test_generated_ticket_round_trips() -> Result<(), anyhow::Error> {
    let ticket = JwtTokenGenerator::new(test_token_options())
        .generate_access_token_with_principal(
            "username@org.com",
            &[
                Claim::new(claim_types::GIVEN_NAME, "FName"),
                Claim::new(claim_types::SURNAME, "LName"),
            ],
        )?
        .into_ticket(DEFAULT_AUTHENTICATION_SCHEME);
    let format = test_ticket_format(PURPOSE);

    let cookie = format.protect(&ticket)?;
    let restored = format.unprotect(&cookie).expect("ticket should round-trip");

    assert_eq!(restored, ticket);
    assert_eq!(restored.principal().name(), Some("username@org.com"));
    let given_name = restored
        .principal()
        .find_first(claim_types::GIVEN_NAME)
        .expect("given name survives the round trip");
    assert_eq!(given_name.value, "FName");

    Ok(())
}

#[test]
fn test_evil_token_yields_none() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let cookie = format.protect(&ticket_carrying("Evil Token"))?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_expired_embedded_token_yields_none() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let token = TestTokenBuilder::new().expired().build();
    let cookie = format.protect(&ticket_carrying(&token))?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_hs384_embedded_token_yields_none() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let token = TestTokenBuilder::new()
        .with_algorithm(Algorithm::HS384)
        .build();
    let cookie = format.protect(&ticket_carrying(&token))?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_foreign_key_embedded_token_yields_none() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let token = TestTokenBuilder::new()
        .signed_with_key(OTHER_SIGNING_KEY)
        .build();
    let cookie = format.protect(&ticket_carrying(&token))?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_forged_valid_token_is_accepted() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let ticket = ticket_carrying(&TestTokenBuilder::new().build());
    let cookie = format.protect(&ticket)?;
    assert_eq!(format.unprotect(&cookie), Some(ticket));
    Ok(())
}

#[test]
fn test_empty_properties_yield_none() -> Result<(), anyhow::Error> {
    let format = test_ticket_format(PURPOSE);
    let ticket = AuthenticationTicket::new(
        create_principal(vec![], None, None),
        AuthProperties::new(),
        DEFAULT_AUTHENTICATION_SCHEME,
    );
    let cookie = format.protect(&ticket)?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_cookie_from_other_purpose_yields_none() -> Result<(), anyhow::Error> {
    let ticket = ticket_carrying(&TestTokenBuilder::new().build());
    let cookie = test_ticket_format("other-app-Auth1").protect(&ticket)?;
    assert!(test_ticket_format(PURPOSE).unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_cookie_for_other_audience_yields_none() -> Result<(), anyhow::Error> {
    let other = jwt_auth::TokenOptions::new(TEST_ISSUER, "Someone.Else", TEST_SIGNING_KEY)?;
    let format = test_ticket_format_with(&other, PURPOSE);

    let cookie = format.protect(&ticket_carrying(&TestTokenBuilder::new().build()))?;
    assert!(format.unprotect(&cookie).is_none());
    Ok(())
}

#[test]
fn test_arbitrary_text_yields_none() {
    let format = test_ticket_format(PURPOSE);
    let oversized = "A".repeat(4096);
    for text in ["", "Evil Token", "AAAA", "%%%%", oversized.as_str()] {
        assert!(format.unprotect(text).is_none(), "accepted {text:?}");
    }
}
