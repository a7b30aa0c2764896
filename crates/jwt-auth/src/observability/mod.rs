//! Logging helpers and metrics.
//!
//! # Privacy
//!
//! Public operations use `#[instrument(skip_all)]` so tokens, keys and claim
//! values never become span fields. Fields fall into three groups:
//! - **SAFE**: logged in plaintext (outcomes, reason codes, sizes)
//! - **HASHED**: SHA-256 prefix for correlation (subjects)
//! - **NEVER**: tokens, cookie text, key material

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for subjects so that issuance and validation events for the same
/// user can be correlated without storing the user name.
#[must_use]
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_for_correlation_is_stable() {
        let a = hash_for_correlation("username@org.com");
        let b = hash_for_correlation("username@org.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_hash_for_correlation_differs_per_input() {
        assert_ne!(hash_for_correlation("alice"), hash_for_correlation("bob"));
    }

    #[test]
    fn test_hash_for_correlation_does_not_leak_input() {
        let hashed = hash_for_correlation("alice@example.com");
        assert!(!hashed.contains("alice"));
    }
}
