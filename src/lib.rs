//! Sealfile - Password-based file encryption using PBKDF2 and AES-256-GCM

#![forbid(unsafe_code)]

pub mod aead;
pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod password;
pub mod sealcrypt;
