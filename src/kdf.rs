//! Password-based key derivation using PBKDF2-HMAC-SHA256

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroize;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count. Fixed, since changing it changes every key.
pub const PBKDF2_ITERATIONS: u32 = 4096;

/// A 256-bit key derived from a password.
///
/// Zeroized on drop and redacted in `Debug` output.
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 32-byte key from a password and salt.
///
/// Any byte sequence is valid for either argument, including the empty one.
pub fn derive_key(password: &[u8], salt: &[u8]) -> DerivedKey {
    let mut key = DerivedKey {
        bytes: [0u8; KEY_LEN],
    };
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key.bytes);
    tracing::debug!(
        iterations = PBKDF2_ITERATIONS,
        salt_len = salt.len(),
        "derived key"
    );
    key
}
