//! Configuration schema types
//!
//! The root structure maps to the TOML file. Every section validates itself;
//! `ArcaConfig::validate` runs all of them before the pipeline starts.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Arca configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Source queue settings
    pub queue: QueueConfig,

    /// Destination topic settings
    pub events: EventsConfig,

    /// Local OCFL repository settings
    pub ocfl: OcflConfig,

    /// Upstream preservation API settings
    pub preservica: PreservicaConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArcaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.queue.validate()?;
        self.events.validate()?;
        self.ocfl.validate()?;
        self.preservica.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (classify and report, never stage, commit, publish or ack)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Source queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// URL of the SQS queue carrying change notifications
    pub sqs_queue_url: String,

    /// Long-poll wait per receive call, 0-20 seconds
    #[serde(default = "default_wait_time_seconds")]
    pub wait_time_seconds: u32,

    /// Messages per receive call, 1-10
    #[serde(default = "default_max_messages")]
    pub max_messages: u32,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        if self.sqs_queue_url.trim().is_empty() {
            return Err("queue.sqs_queue_url must not be empty".to_string());
        }
        if self.wait_time_seconds > 20 {
            return Err("queue.wait_time_seconds must be between 0 and 20".to_string());
        }
        if !(1..=10).contains(&self.max_messages) {
            return Err("queue.max_messages must be between 1 and 10".to_string());
        }
        Ok(())
    }
}

/// Destination topic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// ARN of the SNS topic receiving change events
    pub topic_arn: String,
}

impl EventsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.topic_arn.trim().is_empty() {
            return Err("events.topic_arn must not be empty".to_string());
        }
        Ok(())
    }
}

/// Local OCFL repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcflConfig {
    /// Durable repository root
    pub repo_dir: String,

    /// Scratch directory for version assembly; must share a filesystem with
    /// the repository root so renames are atomic
    pub work_dir: String,
}

impl OcflConfig {
    fn validate(&self) -> Result<(), String> {
        if self.repo_dir.trim().is_empty() {
            return Err("ocfl.repo_dir must not be empty".to_string());
        }
        if self.work_dir.trim().is_empty() {
            return Err("ocfl.work_dir must not be empty".to_string());
        }
        if self.repo_dir == self.work_dir {
            return Err("ocfl.repo_dir and ocfl.work_dir must differ".to_string());
        }
        Ok(())
    }
}

/// Upstream preservation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreservicaConfig {
    /// Base URL of the preservation API
    pub base_url: String,

    /// Name of the hosted secret holding the credential, resolved by the
    /// deployment environment into username/password
    #[serde(default)]
    pub secret_name: Option<String>,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Retry behaviour for transient upstream failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl PreservicaConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "preservica.base_url must be an http(s) URL, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("preservica.timeout_seconds must be positive".to_string());
        }
        if self.secret_name.is_none() && (self.username.is_none() || self.password.is_none()) {
            return Err(
                "preservica requires either secret_name or username and password".to_string(),
            );
        }
        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplier applied per attempt
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable rolling JSON file logs
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory receiving log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local_enabled".to_string());
        }
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_wait_time_seconds() -> u32 {
    10
}

fn default_max_messages() -> u32 {
    10
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_tls_verify() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
