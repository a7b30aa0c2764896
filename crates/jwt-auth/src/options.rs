//! Token options and the validation parameters derived from them.

use crate::errors::AuthError;
use crate::secret::{secret_bytes, ExposeSecret, SecretBox};
use jsonwebtoken::Algorithm;
use std::fmt;

/// The only algorithm tokens are signed with and accepted under.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default access token lifetime in minutes.
pub const DEFAULT_TOKEN_EXPIRY_MINUTES: u32 = 5;

/// Minimum HMAC signing key length in bytes (128 bits).
pub const MIN_SIGNING_KEY_LEN: usize = 16;

/// Options required to generate and validate a token.
///
/// Built once per application and shared read-only (wrap in `Arc` to share
/// across threads). The signing key is held in a `SecretBox` so `Debug`
/// output never contains it.
pub struct TokenOptions {
    issuer: String,
    audience: String,
    signing_key: SecretBox<Vec<u8>>,
    token_expiry_minutes: u32,
}

impl TokenOptions {
    /// Creates options with the default expiry of
    /// [`DEFAULT_TOKEN_EXPIRY_MINUTES`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the issuer or audience is blank,
    /// or the signing key is shorter than [`MIN_SIGNING_KEY_LEN`].
    pub fn new(issuer: &str, audience: &str, raw_signing_key: &[u8]) -> Result<Self, AuthError> {
        Self::with_expiry(
            issuer,
            audience,
            raw_signing_key,
            DEFAULT_TOKEN_EXPIRY_MINUTES,
        )
    }

    /// Creates options with an explicit token lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the issuer or audience is blank,
    /// the signing key is shorter than [`MIN_SIGNING_KEY_LEN`], or the expiry
    /// is zero.
    pub fn with_expiry(
        issuer: &str,
        audience: &str,
        raw_signing_key: &[u8],
        token_expiry_minutes: u32,
    ) -> Result<Self, AuthError> {
        if audience.trim().is_empty() {
            return Err(AuthError::Configuration(
                "Audience is mandatory in order to generate a JWT".to_string(),
            ));
        }

        if issuer.trim().is_empty() {
            return Err(AuthError::Configuration(
                "Issuer is mandatory in order to generate a JWT".to_string(),
            ));
        }

        if raw_signing_key.is_empty() {
            return Err(AuthError::Configuration(
                "SigningKey is mandatory in order to generate a JWT".to_string(),
            ));
        }

        if raw_signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(AuthError::Configuration(format!(
                "SigningKey must be at least 128 bits ({MIN_SIGNING_KEY_LEN} bytes), got {} bytes",
                raw_signing_key.len()
            )));
        }

        if token_expiry_minutes == 0 {
            return Err(AuthError::Configuration(
                "Token expiry must be at least one minute".to_string(),
            ));
        }

        Ok(Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            signing_key: secret_bytes(raw_signing_key),
            token_expiry_minutes,
        })
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Raw HMAC key bytes. Callers must not log the returned slice.
    #[must_use]
    pub fn signing_key(&self) -> &[u8] {
        self.signing_key.expose_secret()
    }

    #[must_use]
    pub fn token_expiry_minutes(&self) -> u32 {
        self.token_expiry_minutes
    }

    /// Parameters enforcing exactly what this generator signs: matching
    /// issuer and audience, the same key, a required expiry and no clock
    /// skew.
    #[must_use]
    pub fn to_validation_parameters(&self) -> TokenValidationParameters {
        TokenValidationParameters {
            valid_issuer: self.issuer.clone(),
            valid_audience: self.audience.clone(),
            signing_key: secret_bytes(self.signing_key()),
            clock_skew_seconds: 0,
            require_expiration_time: true,
            validate_lifetime: true,
        }
    }
}

impl fmt::Debug for TokenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenOptions")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("signing_key", &"[REDACTED]")
            .field("token_expiry_minutes", &self.token_expiry_minutes)
            .finish()
    }
}

/// Checks applied to an inbound token.
///
/// Shared by [`crate::validator`] and the cookie ticket codec so both
/// carriers enforce identical rules.
pub struct TokenValidationParameters {
    pub valid_issuer: String,
    pub valid_audience: String,
    pub signing_key: SecretBox<Vec<u8>>,
    /// Leeway applied to `exp` and `nbf`
    pub clock_skew_seconds: u64,
    pub require_expiration_time: bool,
    /// Check `nbf`/`exp` against the current time
    pub validate_lifetime: bool,
}

impl fmt::Debug for TokenValidationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidationParameters")
            .field("valid_issuer", &self.valid_issuer)
            .field("valid_audience", &self.valid_audience)
            .field("signing_key", &"[REDACTED]")
            .field("clock_skew_seconds", &self.clock_skew_seconds)
            .field("require_expiration_time", &self.require_expiration_time)
            .field("validate_lifetime", &self.validate_lifetime)
            .finish()
    }
}
