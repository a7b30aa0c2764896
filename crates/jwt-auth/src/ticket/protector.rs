//! Authenticated encryption for cookie tickets.
//!
//! Each protector derives its own AES-256-GCM key from a 32-byte master key
//! with HKDF-SHA256. The application name is the HKDF salt and the purpose
//! chain is the info, so a ticket protected for one application or purpose
//! cannot be opened by a protector configured for another.
//!
//! Envelope layout:
//!
//! ```text
//! version (1) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! The version byte is bound as additional authenticated data.

use ring::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN},
    hkdf,
    rand::{SecureRandom, SystemRandom},
};
use std::fmt;
use thiserror::Error;
use tracing::instrument;

/// Current envelope format.
pub const ENVELOPE_VERSION: u8 = 1;

/// Required master key length in bytes (AES-256).
pub const MASTER_KEY_LEN: usize = 32;

const TAG_LEN: usize = 16;

/// Errors raised by a [`DataProtector`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtectionError {
    #[error("Invalid protection key: {0}")]
    InvalidKey(String),

    #[error("Payload encryption failed")]
    Encryption,

    /// Deliberately says nothing about which check failed.
    #[error("The payload was invalid")]
    Decryption,
}

/// Encrypts and authenticates opaque payloads.
pub trait DataProtector: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProtectionError::Encryption` if sealing fails.
    fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectionError>;

    /// # Errors
    ///
    /// Returns `ProtectionError::Decryption` if the envelope was not produced
    /// by a protector with the same key, application and purposes, or was
    /// altered afterwards.
    fn unprotect(&self, protected: &[u8]) -> Result<Vec<u8>, ProtectionError>;
}

/// AES-256-GCM protector with an HKDF-derived per-purpose key.
pub struct AesGcmDataProtector {
    key: LessSafeKey,
    rng: SystemRandom,
    purposes: Vec<String>,
}

impl AesGcmDataProtector {
    /// # Errors
    ///
    /// Returns `ProtectionError::InvalidKey` if `master_key` is not
    /// [`MASTER_KEY_LEN`] bytes or no purpose is given.
    pub fn new(
        master_key: &[u8],
        application_name: &str,
        purposes: &[&str],
    ) -> Result<Self, ProtectionError> {
        if master_key.len() != MASTER_KEY_LEN {
            return Err(ProtectionError::InvalidKey(format!(
                "Invalid master key length: {} (expected {MASTER_KEY_LEN})",
                master_key.len()
            )));
        }

        if purposes.is_empty() {
            return Err(ProtectionError::InvalidKey(
                "At least one purpose is required".to_string(),
            ));
        }

        let derived = derive_purpose_key(master_key, application_name, purposes)?;
        let unbound_key = UnboundKey::new(&AES_256_GCM, &derived)
            .map_err(|e| ProtectionError::InvalidKey(format!("Cipher key creation failed: {e}")))?;

        Ok(Self {
            key: LessSafeKey::new(unbound_key),
            rng: SystemRandom::new(),
            purposes: purposes.iter().map(ToString::to_string).collect(),
        })
    }

    #[must_use]
    pub fn purposes(&self) -> &[String] {
        &self.purposes
    }
}

impl fmt::Debug for AesGcmDataProtector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmDataProtector")
            .field("key", &"[REDACTED]")
            .field("purposes", &self.purposes)
            .finish_non_exhaustive()
    }
}

impl DataProtector for AesGcmDataProtector {
    #[instrument(skip_all)]
    fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectionError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| ProtectionError::Encryption)?;

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from([ENVELOPE_VERSION]),
                &mut in_out,
            )
            .map_err(|_| ProtectionError::Encryption)?;

        let mut envelope = Vec::with_capacity(1 + NONCE_LEN + in_out.len());
        envelope.push(ENVELOPE_VERSION);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&in_out);
        Ok(envelope)
    }

    #[instrument(skip_all)]
    fn unprotect(&self, protected: &[u8]) -> Result<Vec<u8>, ProtectionError> {
        let (&version, rest) = protected
            .split_first()
            .ok_or(ProtectionError::Decryption)?;

        if version != ENVELOPE_VERSION {
            tracing::debug!(target: "jwt_auth.protector", version, "Unknown envelope version");
            return Err(ProtectionError::Decryption);
        }

        if rest.len() < NONCE_LEN + TAG_LEN {
            return Err(ProtectionError::Decryption);
        }

        let nonce_bytes = rest.get(..NONCE_LEN).ok_or(ProtectionError::Decryption)?;
        let sealed = rest.get(NONCE_LEN..).ok_or(ProtectionError::Decryption)?;

        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| ProtectionError::Decryption)?;

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from([version]), &mut in_out)
            .map_err(|_| ProtectionError::Decryption)?;

        Ok(plaintext.to_vec())
    }
}

/// Derive the AES key for one application and purpose chain.
///
/// Each purpose is length-prefixed so `["ab", "c"]` and `["a", "bc"]`
/// derive different keys.
fn derive_purpose_key(
    master_key: &[u8],
    application_name: &str,
    purposes: &[&str],
) -> Result<[u8; MASTER_KEY_LEN], ProtectionError> {
    let mut info = Vec::new();
    for purpose in purposes {
        let len = u32::try_from(purpose.len())
            .map_err(|_| ProtectionError::InvalidKey("Purpose is too long".to_string()))?;
        info.extend_from_slice(&len.to_be_bytes());
        info.extend_from_slice(purpose.as_bytes());
    }

    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, application_name.as_bytes());
    let prk = salt.extract(master_key);
    let info_parts = [info.as_slice()];
    let okm = prk
        .expand(&info_parts, PurposeKeyLen)
        .map_err(|_| ProtectionError::InvalidKey("HKDF expand failed".to_string()))?;

    let mut key = [0u8; MASTER_KEY_LEN];
    okm.fill(&mut key)
        .map_err(|_| ProtectionError::InvalidKey("HKDF fill failed".to_string()))?;
    Ok(key)
}

/// Output length marker for HKDF expansion.
struct PurposeKeyLen;

impl hkdf::KeyType for PurposeKeyLen {
    fn len(&self) -> usize {
        MASTER_KEY_LEN
    }
}
