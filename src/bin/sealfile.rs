//! Sealfile CLI - Password-based file encryption
//!
//! Command-line interface for encrypting and decrypting files in place
//! using AES-256-GCM with PBKDF2 key derivation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use sealfile::file_ops;
use sealfile::password::{
    ConfirmingPasswordReader, DEFAULT_CONFIRM_ATTEMPTS, PasswordReader, ReaderPasswordReader,
    TerminalPasswordReader,
};

#[derive(Parser)]
#[command(name = "sealfile")]
#[command(version)]
#[command(about = "Password-based file encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    password_stdin: bool,

    /// How many times to ask for a matching password confirmation when encrypting
    #[arg(long, global = true, value_name = "N",
          default_value_t = DEFAULT_CONFIRM_ATTEMPTS as u32,
          value_parser = clap::value_parser!(u32).range(1..))]
    confirm_attempts: u32,

    /// Log pipeline steps to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file, replacing its contents
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Write the encrypted file here instead of replacing FILE
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt a file, replacing its contents
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Write the decrypted file here instead of replacing FILE
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encrypt { path, output } => {
            let output = output.unwrap_or_else(|| path.clone());
            let mut reader: Box<dyn PasswordReader> = if cli.password_stdin {
                Box::new(ReaderPasswordReader::new(Box::new(std::io::stdin())))
            } else {
                Box::new(ConfirmingPasswordReader::terminal(cli.confirm_attempts as usize))
            };
            file_ops::encrypt_file(&path, &output, &mut *reader)
        }
        Commands::Decrypt { path, output } => {
            let output = output.unwrap_or_else(|| path.clone());
            let mut reader: Box<dyn PasswordReader> = if cli.password_stdin {
                Box::new(ReaderPasswordReader::new(Box::new(std::io::stdin())))
            } else {
                Box::new(TerminalPasswordReader::new())
            };
            file_ops::decrypt_file(&path, &output, &mut *reader)
        }
    };

    if let Err(e) = result {
        tracing::debug!(category = ?e.category, kind = ?e.kind, "operation failed");
        eprintln!("Error: {}", e.chain_message());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
