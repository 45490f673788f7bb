//! The `init` command: write a starter configuration file

use clap::Args;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration file
    #[arg(long, default_value = "arca.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

const SAMPLE_CONFIG: &str = r#"# Arca configuration

[application]
log_level = "info"
dry_run = false

[queue]
sqs_queue_url = "https://sqs.eu-west-1.amazonaws.com/123456789012/arca-changes"
wait_time_seconds = 10
max_messages = 10

[events]
topic_arn = "arn:aws:sns:eu-west-1:123456789012:arca-events"

[ocfl]
repo_dir = "/var/arca/repo"
work_dir = "/var/arca/work"

[preservica]
base_url = "https://preservica.example.com"
# Either reference the hosted credential...
secret_name = "arca/preservica"
# ...or supply basic auth directly (supports ${VAR} substitution):
# username = "arca"
# password = "${PRESERVICA_PASSWORD}"
timeout_seconds = 30
tls_verify = true

[preservica.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

impl InitArgs {
    /// Execute the init command, returning the process exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);
        if path.exists() && !self.force {
            eprintln!(
                "{} already exists; pass --force to overwrite",
                path.display()
            );
            return Ok(2);
        }

        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Wrote {}", path.display());
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: crate::config::ArcaConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.queue.max_messages, 10);
    }
}
