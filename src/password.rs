//! Password reading functionality

use crate::error::{ErrorCategory, ErrorKind, Result, SealfileError};
use std::io::{self, IsTerminal, Read};
use zeroize::Zeroizing;

/// Default number of entry/confirmation rounds before giving up.
pub const DEFAULT_CONFIRM_ATTEMPTS: usize = 3;

/// Trait for reading passwords from various sources
pub trait PasswordReader {
    /// Read a password as arbitrary bytes (not necessarily UTF-8)
    ///
    /// Returns the password wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_password(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Returns a fixed password (for testing)
pub struct ConstantPasswordReader {
    password: Zeroizing<Vec<u8>>,
}

impl ConstantPasswordReader {
    pub fn new(password: Vec<u8>) -> Self {
        Self {
            password: Zeroizing::new(password),
        }
    }
}

impl PasswordReader for ConstantPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new((*self.password).clone()))
    }
}

/// Reads the password from any io::Read source, consuming it to the end
pub struct ReaderPasswordReader {
    reader: Box<dyn Read>,
}

impl ReaderPasswordReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PasswordReader for ReaderPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            SealfileError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "error reading password",
                e,
            )
        })?;
        Ok(data)
    }
}

/// Reads the password from the terminal with no echo
pub struct TerminalPasswordReader {
    prompt: String,
}

impl TerminalPasswordReader {
    pub fn new() -> Self {
        Self::with_prompt("Password (sealfile): ")
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for TerminalPasswordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordReader for TerminalPasswordReader {
    /// Read password from terminal.
    ///
    /// Note: Terminal input is limited to UTF-8 due to rpassword library constraints.
    /// For non-UTF-8 passwords, use --password-stdin instead.
    fn read_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(SealfileError::with_kind(
                ErrorCategory::User,
                ErrorKind::PasswordUnavailable,
                "cannot read password from terminal - stdin is not a terminal",
            ));
        }

        // rpassword prints the prompt to the tty and reads *without echo*
        let password = rpassword::prompt_password(&self.prompt).map_err(|e| {
            SealfileError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PasswordUnavailable,
                "failure reading password",
                e,
            )
        })?;

        Ok(Zeroizing::new(password.into_bytes()))
    }
}

/// Requires two independently entered passwords to match
///
/// Each attempt reads one entry from `entry` and one from `confirmation`.
/// On mismatch the pair is discarded and both are read again, up to
/// `max_attempts` rounds, after which `PasswordMismatch` is returned.
/// Errors from either upstream reader end the loop immediately.
pub struct ConfirmingPasswordReader {
    entry: Box<dyn PasswordReader>,
    confirmation: Box<dyn PasswordReader>,
    max_attempts: usize,
}

impl ConfirmingPasswordReader {
    pub fn new(
        entry: Box<dyn PasswordReader>,
        confirmation: Box<dyn PasswordReader>,
        max_attempts: usize,
    ) -> Self {
        Self {
            entry,
            confirmation,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Two no-echo terminal prompts, entry then confirmation.
    pub fn terminal(max_attempts: usize) -> Self {
        Self::new(
            Box::new(TerminalPasswordReader::new()),
            Box::new(TerminalPasswordReader::with_prompt(
                "Confirm password (sealfile): ",
            )),
            max_attempts,
        )
    }
}

impl PasswordReader for ConfirmingPasswordReader {
    fn read_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        for attempt in 1..=self.max_attempts {
            let password = self.entry.read_password()?;
            let confirmation = self.confirmation.read_password()?;
            if *password == *confirmation {
                return Ok(password);
            }
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                "passwords do not match"
            );
        }

        Err(SealfileError::with_kind(
            ErrorCategory::User,
            ErrorKind::PasswordMismatch,
            format!(
                "passwords did not match after {} attempt(s)",
                self.max_attempts
            ),
        ))
    }
}
