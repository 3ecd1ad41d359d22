//! End-to-end tests of the `imgscribe` binary.
//!
//! Every run gets a scratch HOME, state dir and working directory so the
//! user's config, logs and `.env` never leak in. Provider endpoints are pointed
//! at a local `wiremock` server through the config file.

use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn imgscribe(workdir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_imgscribe"));
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .env("XDG_STATE_HOME", workdir.join("state"))
        .env_remove("GROQ_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

async fn run(cmd: &mut Command) -> Output {
    cmd.output().await.expect("failed to run imgscribe")
}

fn workdir_with_image() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scan.jpg"), b"\xFF\xD8\xFF\xE0").unwrap();
    dir
}

/// Writes a config routing both providers to `server`.
fn config_for(dir: &Path, server: &MockServer, provider: &str) -> PathBuf {
    let config_path = dir.join("imgscribe.toml");
    let endpoint = format!("{}{COMPLETIONS_PATH}", server.uri());
    std::fs::write(
        &config_path,
        format!(
            "provider = \"{provider}\"\n\n[providers.groq]\nendpoint = \"{endpoint}\"\n\n[providers.openai]\nendpoint = \"{endpoint}\"\n"
        ),
    )
    .unwrap();
    config_path
}

/// A server that fails the test if it receives any request.
async fn silent_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn missing_groq_key_exits_with_status_one_without_network() {
    let dir = workdir_with_image();
    let server = silent_server().await;
    let config = config_for(dir.path(), &server, "groq");

    let output = run(imgscribe(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("scan.jpg"))
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GROQ_API_KEY"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn missing_openai_key_names_openai_variable() {
    let dir = workdir_with_image();
    let server = silent_server().await;
    let config = config_for(dir.path(), &server, "groq");

    let output = run(imgscribe(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["--provider", "openai", "scan.jpg"]))
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {stderr}");
    server.verify().await;
}

#[tokio::test]
async fn blank_key_counts_as_missing() {
    let dir = workdir_with_image();

    let output = run(imgscribe(dir.path()).env("GROQ_API_KEY", "   ").arg("scan.jpg")).await;

    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn unreadable_image_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let server = silent_server().await;
    let config = config_for(dir.path(), &server, "groq");

    let output = run(imgscribe(dir.path())
        .env("GROQ_API_KEY", "test-key")
        .arg("--config")
        .arg(&config)
        .arg("missing.jpg"))
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.jpg"), "stderr: {stderr}");
    server.verify().await;
}

#[tokio::test]
async fn new_version_resets_output_dir_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("outputs").join("mydoc_data");

    let first = run(imgscribe(dir.path())
        .env("GROQ_API_KEY", "test-key")
        .args(["-n", "mydoc"]))
    .await;
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert!(data_dir.is_dir());
    assert_eq!(std::fs::read_dir(&data_dir).unwrap().count(), 0);

    std::fs::write(data_dir.join("leftover.txt"), "old").unwrap();

    let second = run(imgscribe(dir.path())
        .env("GROQ_API_KEY", "test-key")
        .args(["-n", "mydoc"]))
    .await;
    assert!(second.status.success());
    assert!(data_dir.is_dir());
    assert_eq!(std::fs::read_dir(&data_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn new_version_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(imgscribe(dir.path()).args(["-n", "mydoc"])).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GROQ_API_KEY"), "stderr: {stderr}");
    assert!(!dir.path().join("outputs").exists());
}

#[tokio::test]
async fn unwritable_state_dir_does_not_block_commands() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the state directory should be
    let state_file = dir.path().join("state");
    std::fs::write(&state_file, "not a directory").unwrap();

    let schema = run(imgscribe(dir.path()).arg("schema")).await;
    assert!(schema.status.success(), "stderr: {}", String::from_utf8_lossy(&schema.stderr));
    assert!(String::from_utf8_lossy(&schema.stderr).contains("Logging disabled"));

    let prepare = run(imgscribe(dir.path())
        .env("GROQ_API_KEY", "test-key")
        .args(["-n", "mydoc"]))
    .await;
    assert!(prepare.status.success());
    assert!(dir.path().join("outputs").join("mydoc_data").is_dir());
}

#[tokio::test]
async fn schema_command_prints_sealed_schema() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(imgscribe(dir.path()).arg("schema")).await;

    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["additionalProperties"], Value::Bool(false));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("$ref"));
}

#[tokio::test]
async fn missing_image_argument_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(&mut imgscribe(dir.path())).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn transcribes_through_configured_endpoint() {
    let dir = workdir_with_image();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"text\":\"  Hello, world  \"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(dir.path(), &server, "openai");

    let output = run(imgscribe(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg("--config")
        .arg(&config)
        .arg("scan.jpg"))
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, world\n");
    server.verify().await;
}
