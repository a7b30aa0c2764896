//! Access token generation.
//!
//! Every token carries the caller's claims plus `name`, `sub`, `jti` and
//! `iat`, and is signed with HMAC-SHA256 using the configured key. The
//! lifetime window is `nbf = now` to `exp = now + token_expiry_minutes`.
//! Caller claims of type `iss`, `aud`, `exp` or `nbf` are dropped; those
//! always come from the options and the clock.

use crate::claims::{claim_types, to_payload, value_types, Claim};
use crate::errors::AuthError;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_token_issuance;
use crate::options::{TokenOptions, SIGNING_ALGORITHM};
use crate::principal::{create_principal, ClaimsPrincipal};
use crate::ticket::{AuthProperties, AuthenticationTicket, TOKEN_NAME};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// A signed token together with the principal and carrier properties built
/// from the same claim set, ready to be handed to the cookie ticket codec.
#[derive(Clone)]
pub struct GeneratedToken {
    pub access_token: String,
    pub principal: ClaimsPrincipal,
    /// Carries `access_token` under [`TOKEN_NAME`]
    pub properties: AuthProperties,
}

impl GeneratedToken {
    /// Package the principal and properties as a ticket for `scheme`.
    #[must_use]
    pub fn into_ticket(self, scheme: &str) -> AuthenticationTicket {
        AuthenticationTicket::new(self.principal, self.properties, scheme)
    }
}

/// Redacts the access token; the principal is safe to show.
impl fmt::Debug for GeneratedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedToken")
            .field("access_token", &"[REDACTED]")
            .field("principal", &self.principal)
            .field("properties", &"[REDACTED]")
            .finish()
    }
}

/// Issues signed access tokens.
pub trait TokenGenerator: Send + Sync {
    /// Sign a token for `user_name` carrying `user_claims` plus the
    /// mandatory claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the encoder fails.
    fn generate_access_token(
        &self,
        user_name: &str,
        user_claims: &[Claim],
    ) -> Result<String, AuthError>;

    /// Like [`TokenGenerator::generate_access_token`], additionally
    /// returning an authenticated principal built from the same merged
    /// claims and a carrier holding the token under [`TOKEN_NAME`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the encoder fails.
    fn generate_access_token_with_principal(
        &self,
        user_name: &str,
        user_claims: &[Claim],
    ) -> Result<GeneratedToken, AuthError>;
}

/// HMAC-SHA256 token generator.
#[derive(Debug, Clone)]
pub struct JwtTokenGenerator {
    options: Arc<TokenOptions>,
}

impl JwtTokenGenerator {
    #[must_use]
    pub fn new(options: Arc<TokenOptions>) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &TokenOptions {
        &self.options
    }

    /// Deterministic-clock variant of `generate_access_token`.
    pub(crate) fn generate_access_token_at(
        &self,
        user_name: &str,
        user_claims: &[Claim],
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = merge_with_default_claims(user_name, user_claims, now);
        self.sign(user_name, &claims, now)
    }

    /// Deterministic-clock variant of `generate_access_token_with_principal`.
    pub(crate) fn generate_access_token_with_principal_at(
        &self,
        user_name: &str,
        user_claims: &[Claim],
        now: DateTime<Utc>,
    ) -> Result<GeneratedToken, AuthError> {
        let claims = merge_with_default_claims(user_name, user_claims, now);
        let access_token = self.sign(user_name, &claims, now)?;

        let mut properties = AuthProperties::new();
        properties.store_token(TOKEN_NAME, &access_token);

        Ok(GeneratedToken {
            principal: create_principal(claims, None, None),
            properties,
            access_token,
        })
    }

    fn sign(
        &self,
        user_name: &str,
        claims: &[Claim],
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let start = Instant::now();
        let expires = now + Duration::minutes(i64::from(self.options.token_expiry_minutes()));

        let mut payload = to_payload(claims);
        payload.insert(claim_types::NBF.to_string(), Value::from(now.timestamp()));
        payload.insert(
            claim_types::EXP.to_string(),
            Value::from(expires.timestamp()),
        );
        payload.insert(
            claim_types::ISS.to_string(),
            Value::from(self.options.issuer()),
        );
        payload.insert(
            claim_types::AUD.to_string(),
            Value::from(self.options.audience()),
        );

        let header = Header::new(SIGNING_ALGORITHM);
        let encoding_key = EncodingKey::from_secret(self.options.signing_key());

        let result = encode(&header, &payload, &encoding_key)
            .map_err(|e| AuthError::Signing(format!("JWT signing operation failed: {e}")));

        let status = if result.is_ok() { "success" } else { "error" };
        record_token_issuance(status, start.elapsed());

        tracing::debug!(
            target: "jwt_auth.generator",
            subject = %hash_for_correlation(user_name),
            claim_count = claims.len(),
            expires_at = expires.timestamp(),
            status,
            "Access token issued"
        );

        result
    }
}

impl TokenGenerator for JwtTokenGenerator {
    #[instrument(skip_all)]
    fn generate_access_token(
        &self,
        user_name: &str,
        user_claims: &[Claim],
    ) -> Result<String, AuthError> {
        self.generate_access_token_at(user_name, user_claims, Utc::now())
    }

    #[instrument(skip_all)]
    fn generate_access_token_with_principal(
        &self,
        user_name: &str,
        user_claims: &[Claim],
    ) -> Result<GeneratedToken, AuthError> {
        self.generate_access_token_with_principal_at(user_name, user_claims, Utc::now())
    }
}

/// Claim types the payload always takes from the options and the clock.
const RESERVED_CLAIM_TYPES: [&str; 4] = [
    claim_types::ISS,
    claim_types::AUD,
    claim_types::EXP,
    claim_types::NBF,
];

/// Caller claims (minus reserved types) followed by `name`, `sub`, a fresh
/// `jti` and `iat`.
fn merge_with_default_claims(
    user_name: &str,
    user_claims: &[Claim],
    now: DateTime<Utc>,
) -> Vec<Claim> {
    let mut claims: Vec<Claim> = user_claims
        .iter()
        .filter(|c| !RESERVED_CLAIM_TYPES.contains(&c.claim_type.as_str()))
        .cloned()
        .collect();
    claims.push(Claim::new(claim_types::NAME, user_name));
    claims.push(Claim::new(claim_types::SUB, user_name));
    claims.push(Claim::new(claim_types::JTI, Uuid::new_v4().to_string()));
    claims.push(Claim::with_value_type(
        claim_types::IAT,
        now.timestamp().to_string(),
        value_types::INTEGER64,
    ));
    claims
}
