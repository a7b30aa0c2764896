//! Claim inspection without signature verification.
//!
//! # Security
//!
//! Nothing here verifies the token. Use it to read claims out of a token
//! whose authenticity was established elsewhere, or for debugging and
//! display. Never base an authorization decision on its output alone.

use crate::claims::{Claim, ClaimsExt};
use crate::errors::AuthError;
use crate::validator::MAX_JWT_SIZE_BYTES;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use serde_json::Value;

/// Read the claims from the payload segment of a compact JWT.
///
/// # Errors
///
/// - `AuthError::MalformedToken` if the token is oversized, has no payload
///   segment, or the segment is not base64url-encoded UTF-8 JSON
/// - `AuthError::NoClaimsFound` if the payload is not a JSON object or the
///   object is empty
pub fn get_claims(jwt: &str) -> Result<Vec<Claim>, AuthError> {
    if jwt.len() > MAX_JWT_SIZE_BYTES {
        return Err(AuthError::MalformedToken(format!(
            "token size {} exceeds maximum of {MAX_JWT_SIZE_BYTES} bytes",
            jwt.len()
        )));
    }

    let payload_segment = jwt
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("JWT payload segment is missing".to_string()))?;

    let payload_bytes = URL_SAFE
        .decode(ensure_valid_length(payload_segment))
        .map_err(|e| {
            tracing::debug!(target: "jwt_auth.parser", error = %e, "Invalid JWT payload base64");
            AuthError::MalformedToken(format!("JWT payload is not valid base64url: {e}"))
        })?;

    let payload: Value = serde_json::from_slice(&payload_bytes).map_err(|e| {
        tracing::debug!(target: "jwt_auth.parser", error = %e, "Failed to parse JWT payload JSON");
        AuthError::MalformedToken(format!("JWT payload is not valid JSON: {e}"))
    })?;

    let claims_set = match payload {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(AuthError::NoClaimsFound),
    };

    Ok(claims_set
        .iter()
        .flat_map(|(claim_type, value)| Claim::from_json(claim_type, value))
        .collect())
}

/// Value of the first claim of `claim_type`, if any.
#[must_use]
pub fn get_claim_value<'a>(claims: &'a [Claim], claim_type: &str) -> Option<&'a str> {
    claims.claim_value(claim_type)
}

/// Pad a base64url segment with `=` up to a multiple of four characters.
fn ensure_valid_length(segment: &str) -> String {
    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}
