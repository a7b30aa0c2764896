//! # jwt-auth Test Utilities
//!
//! Shared test utilities for the `jwt-auth` crate.
//!
//! This crate provides:
//! - Deterministic fixtures (fixed signing keys, options, master keys)
//! - Token forgers (`TestTokenBuilder`) for tokens the generator would
//!   never produce: foreign algorithms, expired, missing claims
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwt_auth_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let options = test_token_options();
//!
//!     let token = TestTokenBuilder::new()
//!         .for_user("alice")
//!         .expired()
//!         .build();
//!
//!     token.assert_valid_jwt().assert_for_subject("alice");
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use token_builders::*;
