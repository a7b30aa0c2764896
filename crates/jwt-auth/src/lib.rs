//! JWT issuance and validation for web application authentication.
//!
//! Two carriers are supported:
//! - **Bearer**: the raw JWT travels in an `Authorization` header and is checked
//!   with [`validator::DefaultTokenValidator`].
//! - **Cookie**: the JWT is embedded in an [`ticket::AuthenticationTicket`] that
//!   [`ticket::JwtTicketFormat`] encrypts into opaque cookie text and re-validates
//!   on the way back in.

#![warn(clippy::pedantic)]

/// Module for crate error types
pub mod errors;

/// Module for claim model and registered claim names
pub mod claims;

/// Module for token options and validation parameters
pub mod options;

/// Module for environment-driven configuration
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for access token generation
pub mod generator;

/// Module for access token validation
pub mod validator;

/// Module for unauthenticated claim inspection
pub mod parser;

/// Module for building claims principals
pub mod principal;

/// Module for encrypted cookie tickets
pub mod ticket;

/// Module for logging helpers and metrics
pub mod observability;

pub use claims::{Claim, ClaimsExt};
pub use errors::AuthError;
pub use generator::{GeneratedToken, JwtTokenGenerator, TokenGenerator};
pub use options::{TokenOptions, TokenValidationParameters};
pub use principal::{ClaimsIdentity, ClaimsPrincipal};
pub use ticket::{AuthProperties, AuthenticationTicket, JwtTicketFormat, SecureDataFormat};
pub use validator::{DefaultTokenValidator, TokenValidator, ValidationResult};
