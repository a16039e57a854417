//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run sealfile with the given stdin contents
fn run_sealfile(args: &[&str], stdin_data: &[u8]) -> Result<Output, std::io::Error> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sealfile"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        // if it encounters an error (e.g., file not found)
        let _ = stdin.write_all(stdin_data);
    }

    child.wait_with_output()
}

/// Run sealfile with password from stdin
fn run_with_password(args: &[&str], password: &str) -> Output {
    let mut full_args = vec!["--password-stdin"];
    full_args.extend_from_slice(args);
    run_sealfile(&full_args, password.as_bytes()).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Get path to testdata directory
fn testdata_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("testdata");
    path.push(filename);
    path
}

fn assert_success(result: &Output, what: &str) {
    assert!(
        result.status.success(),
        "{} failed: {}",
        what,
        String::from_utf8_lossy(&result.stderr)
    );
}

/// Decrypt known ciphertext in place.
#[test]
fn test_decrypt_known_ciphertext() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello.txt.sealed");
    fs::copy(testdata_path("hello.txt.sealed"), &path).unwrap();

    let result = run_with_password(&["decrypt", path_str(&path)], "test");
    assert_success(&result, "decrypt");

    let decrypted = fs::read(&path).unwrap();
    let expected = fs::read(testdata_path("hello.txt")).unwrap();
    assert_eq!(decrypted, expected);
}

#[test]
fn test_encrypt_decrypt_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello.txt");
    fs::copy(testdata_path("hello.txt"), &path).unwrap();
    let original = fs::read(&path).unwrap();

    let result = run_with_password(&["encrypt", path_str(&path)], "test");
    assert_success(&result, "encrypt");
    assert_ne!(fs::read(&path).unwrap(), original);

    let result = run_with_password(&["decrypt", path_str(&path)], "test");
    assert_success(&result, "decrypt");
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[test]
fn test_output_option_and_aliases() {
    let temp_dir = TempDir::new().unwrap();
    let plain = temp_dir.path().join("plain.txt");
    let sealed = temp_dir.path().join("plain.txt.sealed");
    let decrypted = temp_dir.path().join("decrypted.txt");
    fs::write(&plain, "Original content").unwrap();

    let result = run_with_password(&["e", path_str(&plain), "-o", path_str(&sealed)], "test");
    assert_success(&result, "encrypt");
    assert_eq!(fs::read_to_string(&plain).unwrap(), "Original content");

    let result = run_with_password(
        &["d", path_str(&sealed), "--output", path_str(&decrypted)],
        "test",
    );
    assert_success(&result, "decrypt");
    assert_eq!(fs::read_to_string(&decrypted).unwrap(), "Original content");
}

#[test]
fn test_wrong_password_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("secret.txt");
    fs::write(&path, "hello world").unwrap();

    let result = run_with_password(&["encrypt", path_str(&path)], "correct");
    assert_success(&result, "encrypt");
    let envelope = fs::read(&path).unwrap();
    assert_eq!(envelope.len(), 39);

    let result = run_with_password(&["decrypt", path_str(&path)], "incorrect");
    assert!(!result.status.success());
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("bad password"),
        "Expected error message about the password, got: {}",
        stderr
    );
    assert_eq!(fs::read(&path).unwrap(), envelope);
}

#[test]
fn test_decrypt_malformed_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.bin");
    fs::write(&path, b"short").unwrap();

    let result = run_with_password(&["decrypt", path_str(&path)], "test");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("truncated"), "got: {}", stderr);
    assert_eq!(fs::read(&path).unwrap(), b"short");
}

#[test]
fn test_decrypt_nonexistent_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let nonexistent = temp_dir.path().join("nonexistent.sealed");

    let result = run_with_password(&["decrypt", path_str(&nonexistent)], "test");

    assert!(!result.status.success());
    assert!(!nonexistent.exists());
}

#[test]
fn test_terminal_password_requires_tty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plain.txt");
    fs::write(&path, "content").unwrap();

    let result = run_sealfile(&["encrypt", path_str(&path)], b"test").unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("not a terminal"), "got: {}", stderr);
    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

#[test]
fn test_confirm_attempts_must_be_positive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plain.txt");
    fs::write(&path, "content").unwrap();

    let result = run_sealfile(
        &["--confirm-attempts", "0", "encrypt", path_str(&path)],
        b"",
    )
    .unwrap();

    assert!(!result.status.success());
    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

#[test]
fn test_empty_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.txt");
    fs::write(&path, b"").unwrap();

    let result = run_with_password(&["encrypt", path_str(&path)], "test");
    assert_success(&result, "encrypt");
    assert_eq!(fs::read(&path).unwrap().len(), 16 + 12);

    let result = run_with_password(&["decrypt", path_str(&path)], "test");
    assert_success(&result, "decrypt");
    assert_eq!(fs::read(&path).unwrap(), b"");
}

#[test]
fn test_large_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("large.bin");

    let large_content = vec![0x42u8; 1024 * 1024];
    fs::write(&path, &large_content).unwrap();

    let result = run_with_password(&["encrypt", path_str(&path)], "test");
    assert_success(&result, "encrypt");

    let result = run_with_password(&["decrypt", path_str(&path)], "test");
    assert_success(&result, "decrypt");
    assert_eq!(fs::read(&path).unwrap(), large_content);
}
