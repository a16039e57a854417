//! AES-256-GCM sealing and opening
//!
//! Thin wrapper that maps cipher failures onto sealfile error kinds. No
//! associated data is used; the 16-byte tag is appended to the ciphertext.

use crate::error::{ErrorCategory, ErrorKind, Result, SealfileError};
use crate::kdf::DerivedKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

fn cipher(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext` and append the authentication tag.
///
/// Must never be called twice with the same key and nonce for different
/// plaintexts.
pub fn seal(key: &DerivedKey, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let sealed = cipher(key)
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| {
            SealfileError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::CipherFailure,
                format!("encryption failed: {}", e),
            )
        })?;
    tracing::debug!(plaintext_len = plaintext.len(), sealed_len = sealed.len(), "sealed");
    Ok(sealed)
}

/// Verify the tag and decrypt.
///
/// Returns no plaintext at all unless the tag verifies.
pub fn open(key: &DerivedKey, nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Result<Vec<u8>> {
    cipher(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| {
            SealfileError::with_kind(
                ErrorCategory::User,
                ErrorKind::AuthenticationFailed,
                "corrupt input, tampered-with data, or bad password",
            )
        })
}
