//! Secret types for key material that must never be logged.
//!
//! Re-exports [`secrecy`] so the rest of the crate (and callers building
//! [`crate::TokenOptions`]) share one definition. `SecretBox<T>` and
//! `SecretString` implement `Debug` with redaction and zeroize on drop, so a
//! struct deriving `Debug` around them is safe to pass to `tracing`.
//!
//! # Example
//!
//! ```rust
//! use jwt_auth::secret::{ExposeSecret, SecretBox};
//!
//! let key: SecretBox<Vec<u8>> = SecretBox::new(Box::new(b"hmac-secret".to_vec()));
//! assert!(!format!("{key:?}").contains("hmac-secret"));
//! assert_eq!(key.expose_secret().as_slice(), b"hmac-secret");
//! ```
//!
//! Use `SecretBox<Vec<u8>>` for:
//! - HMAC signing keys
//! - Ticket master keys
//!
//! Use `SecretString` for:
//! - The `JWT_SIGNING_KEY` text read by [`crate::config::Config`] before it
//!   becomes key bytes

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Wrap raw key bytes in a `SecretBox`.
#[must_use]
pub fn secret_bytes(bytes: &[u8]) -> SecretBox<Vec<u8>> {
    SecretBox::new(Box::new(bytes.to_vec()))
}
