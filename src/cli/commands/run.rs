//! The `run` command: the replication loop

use crate::adapters::events::SnsEventPublisher;
use crate::adapters::ocfl::OcflRepository;
use crate::adapters::preservica::RestEntityClient;
use crate::adapters::queue::{QueueClient, SqsQueueClient};
use crate::adapters::xml::XipValidator;
use crate::config::load_config;
use crate::core::compose::Composer;
use crate::core::pipeline::BatchCoordinator;
use crate::core::resolve::EntityResolver;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Region;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Process a single receive batch, then exit
    #[arg(long)]
    pub once: bool,

    /// Classify and report without staging, committing, publishing or acking
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command, returning the process exit code
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration error");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;

        let region_provider =
            RegionProviderChain::default_provider().or_else(Region::new("eu-west-1"));
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let queue: Arc<dyn QueueClient> =
            Arc::new(SqsQueueClient::new(&aws_config, &config.queue));
        let publisher = Arc::new(SnsEventPublisher::new(&aws_config, &config.events));
        let entity_client = Arc::new(RestEntityClient::new(config.preservica.clone())?);
        let store = Arc::new(OcflRepository::open(&config.ocfl)?);

        let composer = Composer::new(Arc::new(XipValidator::new()));
        let resolver = EntityResolver::new(entity_client.clone(), composer);

        let coordinator = BatchCoordinator::new(
            queue.clone(),
            publisher,
            entity_client.clone(),
            resolver,
            store,
            dry_run,
        );

        if let Err(e) = entity_client.health_check().await {
            tracing::warn!(error = %e, "Upstream health check failed, continuing anyway");
        }

        tracing::info!(
            queue = %config.queue.sqs_queue_url,
            topic = %config.events.topic_arn,
            repo = %config.ocfl.repo_dir,
            dry_run,
            once = self.once,
            "Starting replication loop"
        );

        loop {
            if *shutdown.borrow_and_update() {
                tracing::info!("Shutdown requested, stopping replication loop");
                break;
            }

            let carriers = match queue.receive().await {
                Ok(carriers) => carriers,
                Err(e) => {
                    tracing::error!(error = %e, "Queue receive failed");
                    if self.once {
                        return Ok(5);
                    }
                    continue;
                }
            };

            if carriers.is_empty() {
                tracing::debug!("No messages visible");
                if self.once {
                    break;
                }
                continue;
            }

            match coordinator.process(carriers).await {
                Ok(summary) => summary.log_summary(),
                Err(e) => {
                    // The batch was not acknowledged; the queue redelivers it
                    tracing::error!(error = %e, "Batch aborted");
                    if self.once {
                        return Ok(5);
                    }
                }
            }

            if self.once {
                break;
            }
        }

        Ok(0)
    }
}
