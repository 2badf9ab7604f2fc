//! Integration tests for the profile-fetch binary
//!
//! Runs the built binary against a mock provider and checks argument
//! handling, startup failures and cache reuse across runs.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::matchers::{header, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALICE: &str = "https://x.test/in/alice";
const ALICE_PAYLOAD: &str = r#"{"full_name":"Alice A","occupation":"Engineer at Acme","experiences":[{"company":"Acme","title":"Eng","starts_at":{"month":1,"year":2020},"ends_at":null}]}"#;

/// Builds a command for the binary with a clean provider environment
fn command(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_profile-fetch"));
    cmd.current_dir(cwd)
        .env_remove("PROXYCURL_API_KEY")
        .env_remove("PROXYCURL_API_URL")
        .env("RUST_LOG", "off");
    cmd
}

/// Runs a prepared command off the async runtime
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute profile-fetch"))
        .await
        .expect("Command task panicked")
}

fn with_provider(cmd: &mut Command, mock_server: &MockServer) {
    cmd.env("PROXYCURL_API_KEY", "test-key")
        .env("PROXYCURL_API_URL", format!("{}/linkedin", mock_server.uri()));
}

#[test]
fn test_help_flag_exits_successfully() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = command(temp_dir.path())
        .arg("--help")
        .output()
        .expect("Failed to execute profile-fetch");

    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("profile-fetch"), "Help should mention the binary");
    assert!(stdout.contains("--cache-file"), "Help should mention --cache-file");
    assert!(stdout.contains("--format"), "Help should mention --format");
}

#[test]
fn test_invalid_format_prints_error_and_exits() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = command(temp_dir.path())
        .args(["--format", "yaml"])
        .output()
        .expect("Failed to execute profile-fetch");

    assert!(!output.status.success(), "Expected invalid format to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("yaml"), "Should name the bad value: {}", stderr);
}

#[tokio::test]
async fn test_missing_api_key_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALICE_PAYLOAD))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut cmd = command(temp_dir.path());
    cmd.env("PROXYCURL_API_URL", format!("{}/linkedin", mock_server.uri()))
        .arg(ALICE);

    let output = run(cmd).await;

    assert!(!output.status.success(), "Expected missing key to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PROXYCURL_API_KEY"), "Should name the variable: {}", stderr);
    assert!(output.stdout.is_empty(), "Nothing should be rendered");
    assert!(!temp_dir.path().join("linkedin_cache.json").exists());
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("url", ALICE))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALICE_PAYLOAD))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let mut cmd = command(temp_dir.path());
        with_provider(&mut cmd, &mock_server);
        cmd.args(["--no-color", ALICE]);
        outputs.push(run(cmd).await);
    }

    for output in &outputs {
        assert!(output.status.success(), "Run should succeed: {:?}", output);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Usando cache em:"));
        assert!(stdout.contains("Processando perfil 1"));
        assert!(stdout.contains("Alice A"));
        assert!(stdout.contains("1/2020 - Atualmente"));
        assert!(stdout.contains("N/A, N/A, N/A"));
    }
    assert_eq!(outputs[0].stdout, outputs[1].stdout);
    assert!(temp_dir.path().join("linkedin_cache.json").exists());
}

#[tokio::test]
async fn test_provider_error_is_reported_and_run_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut cmd = command(temp_dir.path());
    with_provider(&mut cmd, &mock_server);
    cmd.args(["--no-color", ALICE]);

    let output = run(cmd).await;

    assert!(!output.status.success(), "A failed profile should fail the run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Erro no perfil 1"), "stdout: {}", stdout);
    assert!(stdout.contains("401"));
    assert!(!temp_dir.path().join("linkedin_cache.json").exists());
}

#[tokio::test]
async fn test_failed_profile_does_not_stop_the_batch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("url", "https://x.test/in/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("url", ALICE))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALICE_PAYLOAD))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut cmd = command(temp_dir.path());
    with_provider(&mut cmd, &mock_server);
    cmd.args(["--no-color", "https://x.test/in/missing", ALICE]);

    let output = run(cmd).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Erro no perfil 1"));
    assert!(stdout.contains("Processando perfil 2"));
    assert!(stdout.contains("Alice A"));
}

#[tokio::test]
async fn test_json_format_prints_normalized_profile() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALICE_PAYLOAD))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut cmd = command(temp_dir.path());
    with_provider(&mut cmd, &mock_server);
    cmd.args(["--format", "json", ALICE]);

    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout: {}", stdout);
    let json: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON");
    assert_eq!(json["nome"], "Alice A");
    assert_eq!(json["cargo_atual"], "Engineer at Acme");
    assert_eq!(json["resumo"], "N/A");
    assert_eq!(json["experiencias"][0]["periodo"], "1/2020 - Atualmente");
}

#[tokio::test]
async fn test_json_format_reports_failures_on_stderr() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut cmd = command(temp_dir.path());
    with_provider(&mut cmd, &mock_server);
    cmd.args(["--format", "json", ALICE]);

    let output = run(cmd).await;

    assert!(!output.status.success(), "Expected failed profile to fail the run");
    assert!(output.stdout.is_empty(), "stdout should stay machine-readable");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Erro no perfil 1"), "stderr: {}", stderr);
    assert!(stderr.contains("401"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use profile_fetch::cli::{Cli, StartupConfig, DEFAULT_PROFILE_URLS};
    use profile_fetch::ui::OutputFormat;

    #[test]
    fn test_cli_no_args_uses_default_profiles() {
        let cli = Cli::parse_from(["profile-fetch"]);
        let config = StartupConfig::from_cli(&cli, None);
        assert_eq!(config.profile_urls, DEFAULT_PROFILE_URLS);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_urls_replace_default_profiles() {
        let cli = Cli::parse_from(["profile-fetch", "https://x.test/in/bob"]);
        let config = StartupConfig::from_cli(&cli, None);
        assert_eq!(config.profile_urls, ["https://x.test/in/bob"]);
    }

    #[test]
    fn test_cli_no_color_disables_color() {
        let cli = Cli::parse_from(["profile-fetch", "--no-color"]);
        let config = StartupConfig::from_cli(&cli, None);
        assert!(!config.color);
    }
}
