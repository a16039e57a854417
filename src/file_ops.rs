//! File encryption/decryption operations
//!
//! This module provides high-level file operations for encrypting and
//! decrypting files in the sealfile envelope format. Passing the same path
//! as input and output transforms the file in place.
//!
//! Output is only written after the cryptographic step has succeeded, and
//! always through a tempfile in the destination directory that is synced
//! and then renamed over the destination. Either the old content or the
//! complete new content is present at the destination, never a partial
//! write.
//!
//! A symlinked destination is resolved and its target replaced. Hard links
//! are not followed: the rename gives the destination a new inode, and any
//! other hard link to the old file keeps the old content.

use crate::error::{ErrorCategory, ErrorKind, Result, SealfileError};
use crate::password::PasswordReader;
use crate::sealcrypt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Encrypt a file with a password
///
/// Reads plaintext from `input_path`, encrypts it using a password from
/// `password_reader`, and atomically replaces `output_path` with the envelope.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    password_reader: &mut dyn PasswordReader,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let password = password_reader.read_password()?;
    let envelope = sealcrypt::encrypt(&password, &plaintext)
        .map_err(|e| e.with_context("encryption failed"))?;
    write_file_atomic(output_path, &envelope)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    tracing::info!(
        output = %output_path.display(),
        plaintext_len = plaintext.len(),
        envelope_len = envelope.len(),
        "encrypted"
    );
    Ok(())
}

/// Decrypt a file with a password
///
/// Reads the envelope from `input_path`, decrypts it using a password from
/// `password_reader`, and atomically replaces `output_path` with the plaintext.
/// On any failure the output path is left untouched.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    password_reader: &mut dyn PasswordReader,
) -> Result<()> {
    let envelope = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let password = password_reader.read_password()?;
    let plaintext = sealcrypt::decrypt(&password, &envelope)
        .map_err(|e| e.with_context("failed to decrypt"))?;
    write_file_atomic(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    tracing::info!(
        output = %output_path.display(),
        envelope_len = envelope.len(),
        plaintext_len = plaintext.len(),
        "decrypted"
    );
    Ok(())
}

/// Replace `path` with `contents` via tempfile + fsync + rename.
///
/// An existing `path` is resolved through symlinks first, so the file a
/// link points to is replaced and the link itself stays in place.
fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let resolved = resolve_target(path)?;
    let path = resolved.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::Builder::new()
        .prefix(".sealfile-tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            SealfileError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to create tempfile in {}", dir.display()),
                e,
            )
        })?;
    tracing::debug!(temp = %temp_file.path().display(), "staging output");

    temp_file.write_all(contents).map_err(|e| {
        SealfileError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        SealfileError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        SealfileError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| {
                SealfileError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to set tempfile permissions",
                    e,
                )
            })?;
    }

    // On error the PersistError hands back the tempfile, which is removed
    // when dropped.
    temp_file.persist(path).map_err(|e| {
        SealfileError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e.error,
        )
    })?;
    Ok(())
}

fn resolve_target(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }
    let resolved = fs::canonicalize(path).map_err(|e| {
        SealfileError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to resolve {}", path.display()),
            e,
        )
    })?;
    if resolved != path {
        tracing::debug!(from = %path.display(), to = %resolved.display(), "resolved output path");
    }
    Ok(resolved)
}

fn read_error(path: &Path, err: io::Error) -> SealfileError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    SealfileError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
