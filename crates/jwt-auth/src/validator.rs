//! Access token validation.
//!
//! [`validate_token`] is the single place where a token is checked; both the
//! bearer validator and the cookie ticket codec go through it. The checks:
//!
//! - Size is checked before any parsing (denial-of-service guard)
//! - HMAC signature under the configured key
//! - `iss` and `aud` match exactly
//! - `nbf <= now <= exp` with the configured leeway (zero by default)
//! - `exp` is present
//! - Header `alg` is exactly HS256
//!
//! The structural step accepts the whole HMAC family so a token signed with
//! HS384 or HS512 under the right key still reaches the explicit algorithm
//! check and is rejected as [`TokenValidationError::AlgorithmMismatch`].

use crate::observability::metrics::record_token_validation;
use crate::options::{TokenOptions, TokenValidationParameters, SIGNING_ALGORITHM};
use crate::secret::ExposeSecret;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Typical tokens from this crate are 300-600 bytes. Anything larger than the
/// limit is rejected before base64 decoding or signature verification.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Reason a token failed validation.
///
/// The `Display` text becomes [`ValidationResult::reason`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("Input JWT cannot be null, empty or white space")]
    EmptyToken,

    #[error("TokenOptions cannot be null")]
    MissingOptions,

    #[error("Token exceeds the maximum allowed size")]
    TokenTooLarge,

    #[error("Signature validation failed")]
    InvalidSignature,

    #[error("Lifetime validation failed: the token is expired")]
    Expired,

    #[error("Lifetime validation failed: the token is not yet valid")]
    NotYetValid,

    #[error("Issuer validation failed")]
    InvalidIssuer,

    #[error("Audience validation failed")]
    InvalidAudience,

    #[error("Token is missing required claim '{0}'")]
    MissingClaim(String),

    #[error("Signing algorithm does not match")]
    AlgorithmMismatch,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl TokenValidationError {
    /// Bounded label for metrics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyToken | Self::MissingOptions => "input",
            Self::TokenTooLarge | Self::Malformed(_) => "malformed",
            Self::InvalidSignature => "signature",
            Self::Expired | Self::NotYetValid => "lifetime",
            Self::InvalidIssuer | Self::InvalidAudience | Self::MissingClaim(_) => "claims",
            Self::AlgorithmMismatch => "algorithm",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenValidationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => Self::AlgorithmMismatch,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Outcome of [`TokenValidator::validate`]. `reason` is empty iff valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    reason: String,
}

impl ValidationResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            is_valid: true,
            reason: String::new(),
        }
    }

    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<Result<(), TokenValidationError>> for ValidationResult {
    fn from(outcome: Result<(), TokenValidationError>) -> Self {
        match outcome {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Validates bearer tokens. Never panics and never returns an error: every
/// failure is reported through the result.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, jwt: &str, options: Option<&TokenOptions>) -> ValidationResult;
}

/// Validator enforcing the parameters derived from [`TokenOptions`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTokenValidator;

impl DefaultTokenValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TokenValidator for DefaultTokenValidator {
    #[instrument(skip_all)]
    fn validate(&self, jwt: &str, options: Option<&TokenOptions>) -> ValidationResult {
        let outcome = check_token(jwt, options);

        match &outcome {
            Ok(()) => record_token_validation("success", None),
            Err(e) => {
                tracing::debug!(
                    target: "jwt_auth.validator",
                    category = e.category(),
                    error = %e,
                    "Token rejected"
                );
                record_token_validation("error", Some(e.category()));
            }
        }

        outcome.into()
    }
}

fn check_token(jwt: &str, options: Option<&TokenOptions>) -> Result<(), TokenValidationError> {
    if jwt.trim().is_empty() {
        return Err(TokenValidationError::EmptyToken);
    }

    let options = options.ok_or(TokenValidationError::MissingOptions)?;

    validate_token(jwt, &options.to_validation_parameters()).map(|_| ())
}

/// Verify `jwt` against `params` and return its header and claims.
///
/// # Errors
///
/// Returns the first failing check as a [`TokenValidationError`].
pub fn validate_token(
    jwt: &str,
    params: &TokenValidationParameters,
) -> Result<TokenData<Map<String, Value>>, TokenValidationError> {
    if jwt.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "jwt_auth.validator",
            token_size = jwt.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenValidationError::TokenTooLarge);
    }

    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = params.clock_skew_seconds;
    validation.validate_exp = params.validate_lifetime;
    validation.validate_nbf = params.validate_lifetime;
    validation.set_issuer(&[params.valid_issuer.as_str()]);
    validation.set_audience(&[params.valid_audience.as_str()]);
    if params.require_expiration_time {
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    } else {
        validation.set_required_spec_claims(&["iss", "aud"]);
    }

    let decoding_key = DecodingKey::from_secret(params.signing_key.expose_secret());
    let token_data = decode::<Map<String, Value>>(jwt, &decoding_key, &validation)?;

    if token_data.header.alg != SIGNING_ALGORITHM {
        tracing::debug!(
            target: "jwt_auth.validator",
            alg = ?token_data.header.alg,
            "Token rejected: signing algorithm does not match"
        );
        return Err(TokenValidationError::AlgorithmMismatch);
    }

    Ok(token_data)
}

/// Extract the token from an `Authorization: Bearer <jwt>` header value.
///
/// The scheme is matched case-insensitively; returns `None` for any other
/// scheme or an empty token.
#[must_use]
pub fn bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
