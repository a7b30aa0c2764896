//! Deterministic fixtures for testing
//!
//! The same inputs always produce the same keys, so failures reproduce.

use jwt_auth::options::TokenOptions;
use jwt_auth::ticket::{AesGcmDataProtector, JsonTicketSerializer, JwtTicketFormat};
use std::sync::Arc;

/// HMAC signing key shared by fixtures and forged tokens
pub const TEST_SIGNING_KEY: &[u8] = b"f47b558d-7654-458c-99f2-13b190ef0199";

/// A different key, for wrong-key scenarios
pub const OTHER_SIGNING_KEY: &[u8] = b"0d1c7a3e-1f3b-4f5e-9a2d-8c6b4e2f1a90";

pub const TEST_ISSUER: &str = "Token.WebApp";

pub const TEST_AUDIENCE: &str = "Token.WebApp.Clients";

pub const TEST_APPLICATION_NAME: &str = "jwt-auth-tests";

/// Options for `TEST_ISSUER`, `TEST_AUDIENCE` and `TEST_SIGNING_KEY` with the
/// default five-minute expiry.
pub fn test_token_options() -> Arc<TokenOptions> {
    Arc::new(
        TokenOptions::new(TEST_ISSUER, TEST_AUDIENCE, TEST_SIGNING_KEY)
            .expect("fixture options are valid"),
    )
}

/// Generate a deterministic 32-byte ticket master key.
///
/// # Example
/// ```rust,ignore
/// assert_eq!(test_master_key(1), test_master_key(1));
/// assert_ne!(test_master_key(1), test_master_key(2));
/// ```
pub fn test_master_key(seed: u8) -> [u8; 32] {
    let mut key = [0u8; 32];
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = seed.wrapping_mul(31).wrapping_add(i as u8);
    }
    key
}

/// Cookie ticket codec over `test_token_options()` for the given purpose.
pub fn test_ticket_format(
    purpose: &str,
) -> JwtTicketFormat<AesGcmDataProtector, JsonTicketSerializer> {
    test_ticket_format_with(test_token_options().as_ref(), purpose)
}

/// Cookie ticket codec over arbitrary options.
pub fn test_ticket_format_with(
    options: &TokenOptions,
    purpose: &str,
) -> JwtTicketFormat<AesGcmDataProtector, JsonTicketSerializer> {
    let master_key = test_master_key(1);
    let protector = AesGcmDataProtector::new(&master_key, TEST_APPLICATION_NAME, &[purpose])
        .expect("fixture master key is 32 bytes");
    JwtTicketFormat::new(
        options.to_validation_parameters(),
        JsonTicketSerializer::new(),
        protector,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_is_deterministic() {
        assert_eq!(test_master_key(1), test_master_key(1));
        assert_ne!(test_master_key(1), test_master_key(2));
    }

    #[test]
    fn test_token_options_fixture() {
        let options = test_token_options();
        assert_eq!(options.issuer(), TEST_ISSUER);
        assert_eq!(options.audience(), TEST_AUDIENCE);
        assert_eq!(options.signing_key(), TEST_SIGNING_KEY);
    }
}
