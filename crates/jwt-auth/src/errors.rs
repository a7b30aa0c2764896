//! Error types for token generation, inspection and ticket protection.
//!
//! Validation failures are not errors here: the validator reports them as a
//! [`crate::validator::ValidationResult`] and the ticket codec as `None`.

use crate::ticket::protector::ProtectionError;
use thiserror::Error;

/// Errors raised by the fallible token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Options or key material were missing or blank
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The encoder failed to produce a signed token
    #[error("Signing error: {0}")]
    Signing(String),

    /// Token text is not a well-formed compact JWT
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Payload decoded to an empty or non-object claim set
    #[error("The JWT did not have any claims or claims were invalid!")]
    NoClaimsFound,

    /// Authenticated encryption failed
    #[error("Protection error: {0}")]
    Protection(#[from] ProtectionError),

    /// Ticket could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using `AuthError`
pub type Result<T> = std::result::Result<T, AuthError>;
