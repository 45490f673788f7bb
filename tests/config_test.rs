//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables are serialized through a
//! mutex to avoid interference.

use arca::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("ARCA_APPLICATION_LOG_LEVEL");
    std::env::remove_var("ARCA_APPLICATION_DRY_RUN");
    std::env::remove_var("ARCA_OCFL_REPO_DIR");
    std::env::remove_var("TEST_PRESERVICA_PASSWORD");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const COMPLETE_CONFIG: &str = r#"
[application]
log_level = "debug"
dry_run = false

[queue]
sqs_queue_url = "https://sqs.eu-west-1.amazonaws.com/123456789012/arca-changes"
wait_time_seconds = 5
max_messages = 10

[events]
topic_arn = "arn:aws:sns:eu-west-1:123456789012:arca-events"

[ocfl]
repo_dir = "/var/arca/repo"
work_dir = "/var/arca/work"

[preservica]
base_url = "https://preservica.example.com"
username = "arca"
password = "plain-password"
timeout_seconds = 45

[preservica.retry]
max_retries = 5
initial_delay_ms = 250

[logging]
local_enabled = false
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.queue.wait_time_seconds, 5);
    assert_eq!(
        config.events.topic_arn,
        "arn:aws:sns:eu-west-1:123456789012:arca-events"
    );
    assert_eq!(config.ocfl.repo_dir, "/var/arca/repo");
    assert_eq!(config.preservica.timeout_seconds, 45);
    assert_eq!(config.preservica.retry.max_retries, 5);
    assert_eq!(
        config
            .preservica
            .password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "plain-password"
    );
}

#[test]
fn test_env_substitution_in_password() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PRESERVICA_PASSWORD", "from-env");

    let contents = COMPLETE_CONFIG.replace("plain-password", "${TEST_PRESERVICA_PASSWORD}");
    let file = write_config(&contents);
    let config = load_config(file.path()).unwrap();

    assert_eq!(
        config
            .preservica
            .password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "from-env"
    );

    cleanup_env_vars();
}

#[test]
fn test_unset_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let contents =
        COMPLETE_CONFIG.replace("plain-password", "${ARCA_TEST_UNSET_SUBSTITUTION_VAR}");
    let file = write_config(&contents);
    let result = load_config(file.path());

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("ARCA_TEST_UNSET_SUBSTITUTION_VAR"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("ARCA_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("ARCA_APPLICATION_DRY_RUN", "true");
    std::env::set_var("ARCA_OCFL_REPO_DIR", "/srv/override/repo");

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert!(config.application.dry_run);
    assert_eq!(config.ocfl.repo_dir, "/srv/override/repo");

    cleanup_env_vars();
}

#[test]
fn test_missing_required_section_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let contents = COMPLETE_CONFIG.replace("[queue]", "[queue_renamed]");
    let file = write_config(&contents);
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_validation_failure_surfaces() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    // Same repo and work dir is rejected
    let contents = COMPLETE_CONFIG.replace("/var/arca/work", "/var/arca/repo");
    let file = write_config(&contents);
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("must differ"));
}

#[test]
fn test_defaults_fill_optional_fields() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let minimal = r#"
[queue]
sqs_queue_url = "https://sqs.eu-west-1.amazonaws.com/123456789012/arca-changes"

[events]
topic_arn = "arn:aws:sns:eu-west-1:123456789012:arca-events"

[ocfl]
repo_dir = "/var/arca/repo"
work_dir = "/var/arca/work"

[preservica]
base_url = "https://preservica.example.com"
secret_name = "arca/preservica"
"#;
    let file = write_config(minimal);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.queue.wait_time_seconds, 10);
    assert_eq!(config.queue.max_messages, 10);
    assert_eq!(config.preservica.timeout_seconds, 30);
    assert!(config.preservica.tls_verify);
    assert_eq!(config.preservica.retry.max_retries, 3);
    assert!(!config.logging.local_enabled);
}
