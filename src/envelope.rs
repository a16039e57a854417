//! On-disk envelope layout
//!
//! The envelope is the sealed box followed by the nonce:
//! - sealed box: variable length (ciphertext + 16-byte GCM tag)
//! - nonce: 12 bytes (also the key derivation salt)
//!
//! Putting the nonce last means decoding only needs a fixed-size suffix.

use crate::aead::NONCE_LEN;
use crate::error::{ErrorCategory, ErrorKind, Result, SealfileError};

/// A decoded envelope borrowing from the stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub sealed: &'a [u8],
    pub nonce: [u8; NONCE_LEN],
}

/// Serialize a sealed box and its nonce.
pub fn pack(sealed: &[u8], nonce: &[u8; NONCE_LEN]) -> Vec<u8> {
    let mut output = Vec::with_capacity(sealed.len() + NONCE_LEN);
    output.extend_from_slice(sealed);
    output.extend_from_slice(nonce);
    output
}

/// Split stored bytes into sealed box and nonce.
pub fn unpack(bytes: &[u8]) -> Result<Envelope<'_>> {
    let Some(split) = bytes.len().checked_sub(NONCE_LEN) else {
        return Err(SealfileError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            format!(
                "input likely truncated: {} bytes is too short to contain a {}-byte nonce",
                bytes.len(),
                NONCE_LEN
            ),
        ));
    };
    let (sealed, nonce) = bytes.split_at(split);
    let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| {
        SealfileError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "nonce slice has unexpected length",
        )
    })?;
    Ok(Envelope { sealed, nonce })
}
