//! Encrypted cookie tickets carrying a signed access token.
//!
//! A ticket bundles the principal with an [`AuthProperties`] carrier that
//! holds the raw JWT under [`TOKEN_NAME`]. [`JwtTicketFormat`] serializes the
//! ticket, encrypts it, and encodes it as base64url text for a cookie. On the
//! way back the embedded token is validated again, so a cookie is only as
//! good as the token inside it: an expired token ends the session.
//!
//! `unprotect` reports every failure as `None`. The concrete reason is only
//! visible in debug logs and the `jwt_auth_ticket_unprotect_total` metric.

pub mod protector;
pub mod serializer;

pub use protector::{AesGcmDataProtector, DataProtector, ProtectionError};
pub use serializer::{JsonTicketSerializer, TicketSerializer};

use crate::errors::AuthError;
use crate::observability::metrics::record_ticket_unprotect;
use crate::options::TokenValidationParameters;
use crate::principal::ClaimsPrincipal;
use crate::validator::{validate_token, TokenValidationError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::instrument;

/// Name under which the access token is stored in [`AuthProperties`].
pub const TOKEN_NAME: &str = "jwt";

/// Scheme name for cookie authentication.
pub const DEFAULT_AUTHENTICATION_SCHEME: &str = "Cookies";

const TOKEN_KEY_PREFIX: &str = ".Token.";

/// String key/value carrier attached to a ticket.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProperties {
    #[serde(default)]
    items: BTreeMap<String, String>,
}

impl AuthProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn retrieve(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    /// Store a named token.
    pub fn store_token(&mut self, name: &str, value: &str) {
        self.store(format!("{TOKEN_KEY_PREFIX}{name}"), value);
    }

    #[must_use]
    pub fn token_value(&self, name: &str) -> Option<&str> {
        self.retrieve(&format!("{TOKEN_KEY_PREFIX}{name}"))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Lists keys only; values may be tokens.
impl fmt::Debug for AuthProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProperties")
            .field("keys", &self.items.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Principal, properties and scheme stored inside an encrypted cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationTicket {
    principal: ClaimsPrincipal,
    properties: AuthProperties,
    authentication_scheme: String,
}

impl AuthenticationTicket {
    #[must_use]
    pub fn new(principal: ClaimsPrincipal, properties: AuthProperties, scheme: &str) -> Self {
        Self {
            principal,
            properties,
            authentication_scheme: scheme.to_string(),
        }
    }

    #[must_use]
    pub fn principal(&self) -> &ClaimsPrincipal {
        &self.principal
    }

    #[must_use]
    pub fn properties(&self) -> &AuthProperties {
        &self.properties
    }

    #[must_use]
    pub fn authentication_scheme(&self) -> &str {
        &self.authentication_scheme
    }
}

/// Converts values to and from tamper-proof text.
pub trait SecureDataFormat<T> {
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized or encrypted.
    fn protect(&self, data: &T) -> Result<String, AuthError>;

    /// `None` for any text that does not decode to a valid value.
    fn unprotect(&self, protected_text: &str) -> Option<T>;
}

/// Why a ticket was rejected. Never leaves this module except as a log field
/// and metric label.
#[derive(Debug)]
enum TicketRejection {
    Decode,
    Decrypt,
    Deserialize,
    MissingToken,
    InvalidToken(TokenValidationError),
}

impl TicketRejection {
    fn code(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Decrypt => "decrypt",
            Self::Deserialize => "deserialize",
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
        }
    }
}

/// Cookie ticket codec that requires a valid embedded JWT.
pub struct JwtTicketFormat<P, S> {
    params: TokenValidationParameters,
    serializer: S,
    protector: P,
}

impl<P: DataProtector, S: TicketSerializer> JwtTicketFormat<P, S> {
    #[must_use]
    pub fn new(params: TokenValidationParameters, serializer: S, protector: P) -> Self {
        Self {
            params,
            serializer,
            protector,
        }
    }

    fn try_unprotect(&self, protected_text: &str) -> Result<AuthenticationTicket, TicketRejection> {
        let envelope = URL_SAFE_NO_PAD
            .decode(protected_text.trim())
            .map_err(|_| TicketRejection::Decode)?;

        let payload = self
            .protector
            .unprotect(&envelope)
            .map_err(|_| TicketRejection::Decrypt)?;

        let ticket = self
            .serializer
            .deserialize(&payload)
            .map_err(|_| TicketRejection::Deserialize)?;

        let jwt = ticket
            .properties()
            .token_value(TOKEN_NAME)
            .filter(|t| !t.trim().is_empty())
            .ok_or(TicketRejection::MissingToken)?;

        // Signature, issuer, audience, lifetime and the HS256 pin.
        validate_token(jwt, &self.params).map_err(TicketRejection::InvalidToken)?;

        Ok(ticket)
    }
}

impl<P, S> fmt::Debug for JwtTicketFormat<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTicketFormat")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<P: DataProtector, S: TicketSerializer> SecureDataFormat<AuthenticationTicket>
    for JwtTicketFormat<P, S>
{
    #[instrument(skip_all)]
    fn protect(&self, ticket: &AuthenticationTicket) -> Result<String, AuthError> {
        let payload = self.serializer.serialize(ticket)?;
        let envelope = self.protector.protect(&payload)?;
        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    #[instrument(skip_all)]
    fn unprotect(&self, protected_text: &str) -> Option<AuthenticationTicket> {
        match self.try_unprotect(protected_text) {
            Ok(ticket) => {
                record_ticket_unprotect("success", None);
                Some(ticket)
            }
            Err(rejection) => {
                match &rejection {
                    TicketRejection::InvalidToken(e) => tracing::debug!(
                        target: "jwt_auth.ticket",
                        reason = rejection.code(),
                        category = e.category(),
                        "Ticket rejected"
                    ),
                    _ => tracing::debug!(
                        target: "jwt_auth.ticket",
                        reason = rejection.code(),
                        "Ticket rejected"
                    ),
                }
                record_ticket_unprotect("error", Some(rejection.code()));
                None
            }
        }
    }
}
