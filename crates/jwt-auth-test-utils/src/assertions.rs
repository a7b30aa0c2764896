//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions over compact JWT strings.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use serde_json::{Map, Value};

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject("alice")
///     .assert_has_claim("given_name", "Alice")
///     .assert_expires_in(300);
/// ```
pub trait TokenAssertions {
    /// Assert three segments, an HS256 `JWT` header and a JSON object payload
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert a string claim, or membership when the claim is an array
    fn assert_has_claim(&self, claim_type: &str, value: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;
}

fn payload_of(token: &str) -> Map<String, Value> {
    let parts: Vec<_> = token.split('.').collect();
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .expect("Invalid JWT payload");
    serde_json::from_slice(&payload).expect("Failed to parse JWT claims")
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header_result = URL_SAFE_NO_PAD.decode(parts[0]);
        assert!(
            header_result.is_ok(),
            "Failed to base64 decode JWT header: {:?}",
            header_result.err()
        );

        let header: Result<JwtHeader, _> = serde_json::from_slice(&header_result.unwrap());
        assert!(
            header.is_ok(),
            "Failed to parse JWT header JSON: {:?}",
            header.err()
        );

        let header = header.unwrap();
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let payload_result = URL_SAFE_NO_PAD.decode(parts[1]);
        assert!(
            payload_result.is_ok(),
            "Failed to base64 decode JWT payload: {:?}",
            payload_result.err()
        );

        let payload = payload_result.unwrap();
        let claims: Result<Map<String, Value>, _> = serde_json::from_slice(&payload);
        assert!(
            claims.is_ok(),
            "Failed to parse JWT claims JSON: {:?}",
            claims.err()
        );

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = payload_of(self);
        assert_eq!(
            claims.get("sub").and_then(Value::as_str),
            Some(subject),
            "Expected subject '{}', got {:?}",
            subject,
            claims.get("sub")
        );

        self
    }

    fn assert_has_claim(&self, claim_type: &str, value: &str) -> &Self {
        let claims = payload_of(self);
        let found = match claims.get(claim_type) {
            Some(Value::String(s)) => s == value,
            Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(value)),
            Some(other) => other.to_string() == value,
            None => false,
        };
        assert!(
            found,
            "Token does not contain claim {}='{}'. Claims: {:?}",
            claim_type, value, claims
        );

        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims = payload_of(self);
        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .expect("Token has no numeric exp claim");

        let now = chrono::Utc::now().timestamp();
        let expires_in = exp - now;

        // Allow 5-second tolerance for clock skew
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_token(header: &str, payload: &str) -> String {
        format!(
            "{}.{}.fake_signature_for_testing",
            URL_SAFE_NO_PAD.encode(header.as_bytes()),
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn test_assert_valid_jwt_with_valid_token() {
        let token = fake_token(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"sub":"alice","role":["a","b"],"exp":9999999999}"#,
        );

        token
            .assert_valid_jwt()
            .assert_for_subject("alice")
            .assert_has_claim("role", "b");
    }

    #[test]
    #[should_panic(expected = "JWT must have 3 parts")]
    fn test_assert_valid_jwt_with_invalid_parts() {
        "header.payload".to_string().assert_valid_jwt();
    }

    #[test]
    #[should_panic(expected = "Expected HS256 algorithm")]
    fn test_assert_valid_jwt_with_wrong_algorithm() {
        fake_token(r#"{"alg":"HS384","typ":"JWT"}"#, r#"{"sub":"alice"}"#).assert_valid_jwt();
    }

    #[test]
    #[should_panic(expected = "does not contain claim")]
    fn test_assert_has_claim_missing() {
        fake_token(r#"{"alg":"HS256","typ":"JWT"}"#, r#"{"sub":"alice"}"#)
            .assert_has_claim("given_name", "Alice");
    }
}
