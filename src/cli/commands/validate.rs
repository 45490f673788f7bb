//! The `validate-config` command

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command, returning the process exit code
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration OK: {config_path}");
                println!("  queue:      {}", config.queue.sqs_queue_url);
                println!("  topic:      {}", config.events.topic_arn);
                println!("  ocfl repo:  {}", config.ocfl.repo_dir);
                println!("  ocfl work:  {}", config.ocfl.work_dir);
                println!("  upstream:   {}", config.preservica.base_url);
                Ok(0)
            }
            Err(e) => {
                eprintln!("Configuration invalid: {e}");
                Ok(2)
            }
        }
    }
}
