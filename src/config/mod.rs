//! Configuration management
//!
//! TOML-based configuration with environment variable substitution and
//! overrides, plus secure credential handling.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ArcaConfig, EventsConfig, LoggingConfig, OcflConfig, PreservicaConfig,
    QueueConfig, RetryConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
