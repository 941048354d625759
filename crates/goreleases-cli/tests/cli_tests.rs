//! Integration tests for goreleases-cli.
//!
//! None of these tests reach the public download server: they exercise
//! argument handling and the checks made before any request is sent.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const DIGEST: &str = "d0398903a16ba2232b389fb31032ddf57cac34efda306a0eebac34f0965a0742";

/// Closed local port: connections are refused immediately.
const UNREACHABLE: &str = "http://127.0.0.1:9/";

fn goreleases_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("goreleases");
    cmd.env_remove("GORELEASES_BASE_URL").env_remove("RUST_LOG");
    cmd
}

fn fetch_cmd(dest: &std::path::Path, filename: &str, sha256: &str) -> Command {
    let mut cmd = goreleases_cmd();
    cmd.arg("--base-url")
        .arg(UNREACHABLE)
        .arg("fetch")
        .arg(dest)
        .arg("--filename")
        .arg(filename)
        .arg("--sha256")
        .arg(sha256);
    cmd
}

#[test]
fn test_version_flag() {
    goreleases_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("goreleases"));
}

#[test]
fn test_help_flag() {
    goreleases_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_fetch_help() {
    goreleases_cmd()
        .args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Download, verify and unpack a Go release"))
        .stdout(predicate::str::contains("--sha256"));
}

#[test]
fn test_missing_subcommand() {
    goreleases_cmd().assert().failure();
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    goreleases_cmd()
        .args(["-q", "-v", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_filename_requires_sha256() {
    let temp = TempDir::new().expect("failed to create temp dir");

    goreleases_cmd()
        .arg("fetch")
        .arg(temp.path())
        .args(["--filename", "go1.21.0.linux-amd64.tar.gz"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unsupported_extension_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");

    fetch_cmd(temp.path(), "go1.21.0.windows-amd64.zip", DIGEST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only .tar.gz"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!temp.path().join("go").exists());
}

#[test]
fn test_invalid_digest_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");

    fetch_cmd(temp.path(), "go1.21.0.linux-amd64.tar.gz", "not-a-digest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid sha256 digest"));
}

#[test]
fn test_missing_destination_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = temp.path().join("does-not-exist");

    fetch_cmd(&dest, "go1.21.0.linux-amd64.tar.gz", DIGEST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!dest.exists());
}

#[test]
fn test_destination_is_file_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = temp.path().join("file");
    fs::write(&dest, b"not a directory").unwrap();

    fetch_cmd(&dest, "go1.21.0.linux-amd64.tar.gz", DIGEST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_existing_root_left_untouched() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let existing = temp.path().join("go");
    fs::create_dir(&existing).unwrap();
    fs::write(existing.join("VERSION"), b"go1.20.0").unwrap();

    fetch_cmd(temp.path(), "go1.21.0.linux-amd64.tar.gz", DIGEST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("HINT"));

    assert_eq!(fs::read(existing.join("VERSION")).unwrap(), b"go1.20.0");
}

#[test]
fn test_json_error_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::create_dir(temp.path().join("go")).unwrap();

    let output = goreleases_cmd()
        .args(["--json", "--base-url", UNREACHABLE, "fetch"])
        .arg(temp.path())
        .args(["--filename", "go1.21.0.linux-amd64.tar.gz", "--sha256", DIGEST])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[test]
fn test_network_failure_leaves_nothing_behind() {
    let temp = TempDir::new().expect("failed to create temp dir");

    fetch_cmd(temp.path(), "go1.21.0.linux-amd64.tar.gz", DIGEST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));

    assert!(!temp.path().join("go").exists());
}

#[test]
fn test_base_url_from_environment() {
    let temp = TempDir::new().expect("failed to create temp dir");

    goreleases_cmd()
        .env("GORELEASES_BASE_URL", UNREACHABLE)
        .arg("fetch")
        .arg(temp.path())
        .args(["--filename", "go1.21.0.linux-amd64.tar.gz", "--sha256", DIGEST])
        .assert()
        .failure()
        .stderr(predicate::str::contains("127.0.0.1:9"));
}

#[test]
fn test_list_unreachable_server() {
    goreleases_cmd()
        .args(["--base-url", UNREACHABLE, "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("release catalog"));
}

#[test]
fn test_completion_bash() {
    goreleases_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goreleases"));
}

#[test]
fn test_completion_rejects_unknown_shell() {
    goreleases_cmd()
        .args(["completion", "tcsh"])
        .assert()
        .failure();
}

/// Serves response headers and the first part of an archive, then stalls
/// without closing the connection.
#[cfg(unix)]
fn stalling_server() -> String {
    use std::io::Read;
    use std::io::Write;
    use std::net::TcpListener;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use goreleases_core::test_utils::TarTestBuilder;

    let tar = TarTestBuilder::new()
        .add_directory("go/")
        .add_file("go/VERSION", b"go1.21.0")
        .build();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar[..tar.len() - 1024]).unwrap();
    encoder.flush().unwrap();
    let body = encoder.get_ref().clone();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request);
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
            body.len() + 1_000_000
        )
        .unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
        std::thread::sleep(std::time::Duration::from_secs(300));
    });

    format!("http://{addr}/")
}

#[cfg(unix)]
#[test]
fn test_second_interrupt_aborts_stalled_download() {
    use std::process::Stdio;
    use std::thread;
    use std::time::Duration;
    use std::time::Instant;

    let base_url = stalling_server();
    let temp = TempDir::new().unwrap();
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_goreleases"))
        .env_remove("GORELEASES_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--base-url")
        .arg(&base_url)
        .arg("fetch")
        .arg(temp.path())
        .arg("--filename")
        .arg("go1.21.0.linux-amd64.tar.gz")
        .arg("--sha256")
        .arg(DIGEST)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Wait until the first entries are on disk and the next read blocks.
    let extracted = temp.path().join("go/VERSION");
    let deadline = Instant::now() + Duration::from_secs(30);
    while !extracted.exists() {
        if Instant::now() >= deadline || child.try_wait().unwrap().is_some() {
            let _ = child.kill();
            panic!("extraction did not start");
        }
        thread::sleep(Duration::from_millis(20));
    }
    thread::sleep(Duration::from_millis(500));

    let pid = libc::pid_t::try_from(child.id()).unwrap();
    #[allow(unsafe_code)]
    let interrupt = || unsafe { libc::kill(pid, libc::SIGINT) };

    assert_eq!(interrupt(), 0);
    thread::sleep(Duration::from_millis(500));
    assert!(
        child.try_wait().unwrap().is_none(),
        "a single interrupt cannot unblock a stalled read"
    );

    assert_eq!(interrupt(), 0);
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("second interrupt did not end the process");
        }
        thread::sleep(Duration::from_millis(20));
    };

    assert_eq!(status.code(), Some(130));
    assert!(!temp.path().join("go").exists());
}
