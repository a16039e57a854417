//! Encryption/decryption using PBKDF2 + AES-256-GCM
//!
//! This module composes key derivation, the authenticated cipher and the
//! envelope codec:
//! - PBKDF2-HMAC-SHA256 (4096 iterations) derives the key from the password
//! - AES-256-GCM provides authenticated encryption
//!
//! A single random 12-byte value serves as both the GCM nonce and the
//! PBKDF2 salt, so a repeated nonce would also repeat the key. The binary
//! format is:
//! - sealed box: variable length (includes 16-byte GCM tag)
//! - nonce: 12 bytes

use crate::aead::{self, NONCE_LEN};
use crate::envelope;
use crate::error::Result;
use crate::kdf::derive_key;
use rand::RngCore;
use rand::rngs::OsRng;

/// Encrypt plaintext with a password using a fresh random nonce
///
/// Returns the envelope: sealedbox(variable) + nonce(12)
pub fn encrypt(password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    encrypt_with_nonce(password, plaintext, &nonce)
}

/// Encrypt plaintext with a password using the provided nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates a random nonce.
pub fn encrypt_with_nonce(
    password: &[u8],
    plaintext: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    let key = derive_key(password, nonce);
    let sealed_box = aead::seal(&key, nonce, plaintext)?;
    Ok(envelope::pack(&sealed_box, nonce))
}

/// Decrypt an envelope with a password
pub fn decrypt(password: &[u8], envelope_bytes: &[u8]) -> Result<Vec<u8>> {
    let envelope = envelope::unpack(envelope_bytes)?;
    let key = derive_key(password, &envelope.nonce);
    aead::open(&key, &envelope.nonce, envelope.sealed)
}
