//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading happens in four steps:
//!
//! 1. Read the TOML file
//! 2. Substitute `${VAR}` references from the environment
//! 3. Parse into [`ArcaConfig`]
//! 4. Apply `ARCA_<SECTION>_<KEY>` overrides, then validate
//!
//! The override syntax covers the deployment-relevant scalar settings:
//!
//! ```bash
//! ARCA_APPLICATION_LOG_LEVEL=debug
//! ARCA_APPLICATION_DRY_RUN=true
//! ARCA_QUEUE_SQS_QUEUE_URL=https://sqs.eu-west-1.amazonaws.com/1/changes
//! ARCA_EVENTS_TOPIC_ARN=arn:aws:sns:eu-west-1:1:events
//! ARCA_OCFL_REPO_DIR=/srv/arca/repo
//! ARCA_OCFL_WORK_DIR=/srv/arca/work
//! ARCA_PRESERVICA_BASE_URL=https://preservica.example.com
//! ARCA_PRESERVICA_USERNAME=arca
//! ARCA_PRESERVICA_PASSWORD=secret
//! ```

use crate::config::schema::ArcaConfig;
use crate::config::secret::secret_string;
use crate::domain::errors::ArcaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, TOML parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use arca::config::load_config;
///
/// let config = load_config("arca.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ArcaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ArcaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path).map_err(|e| {
        ArcaError::Configuration(format!("Failed to read {}: {e}", path.display()))
    })?;

    let substituted = substitute_env_vars(&raw)?;

    let mut config: ArcaConfig = toml::from_str(&substituted)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(ArcaError::Configuration)?;

    Ok(config)
}

/// Replaces `${VAR}` references with environment variable values
fn substitute_env_vars(input: &str) -> Result<String> {
    // Unwrap is fine: the pattern is a constant
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex");

    let mut missing = Vec::new();
    let result = pattern.replace_all(input, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(ArcaError::Configuration(format!(
            "Unset environment variable(s) referenced in configuration: {}",
            missing.join(", ")
        )));
    }

    Ok(result.into_owned())
}

/// Applies `ARCA_*` environment variable overrides
fn apply_env_overrides(config: &mut ArcaConfig) -> Result<()> {
    if let Ok(value) = std::env::var("ARCA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = value;
    }
    if let Ok(value) = std::env::var("ARCA_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_bool("ARCA_APPLICATION_DRY_RUN", &value)?;
    }
    if let Ok(value) = std::env::var("ARCA_QUEUE_SQS_QUEUE_URL") {
        config.queue.sqs_queue_url = value;
    }
    if let Ok(value) = std::env::var("ARCA_EVENTS_TOPIC_ARN") {
        config.events.topic_arn = value;
    }
    if let Ok(value) = std::env::var("ARCA_OCFL_REPO_DIR") {
        config.ocfl.repo_dir = value;
    }
    if let Ok(value) = std::env::var("ARCA_OCFL_WORK_DIR") {
        config.ocfl.work_dir = value;
    }
    if let Ok(value) = std::env::var("ARCA_PRESERVICA_BASE_URL") {
        config.preservica.base_url = value;
    }
    if let Ok(value) = std::env::var("ARCA_PRESERVICA_USERNAME") {
        config.preservica.username = Some(value);
    }
    if let Ok(value) = std::env::var("ARCA_PRESERVICA_PASSWORD") {
        config.preservica.password = Some(secret_string(value));
    }
    Ok(())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ArcaError::Configuration(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
