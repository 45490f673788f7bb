//! SNS implementation of the event publisher

use super::EventPublisher;
use crate::config::EventsConfig;
use crate::domain::errors::ArcaError;
use crate::domain::event::ChangeEvent;
use crate::domain::Result;
use async_trait::async_trait;
use aws_sdk_sns::Client;

/// Event publisher backed by Amazon SNS
pub struct SnsEventPublisher {
    client: Client,
    topic_arn: String,
}

impl SnsEventPublisher {
    /// Create a publisher from a shared AWS configuration
    pub fn new(aws_config: &aws_config::SdkConfig, config: &EventsConfig) -> Self {
        Self {
            client: Client::new(aws_config),
            topic_arn: config.topic_arn.clone(),
        }
    }

    /// The topic this publisher targets
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

#[async_trait]
impl EventPublisher for SnsEventPublisher {
    async fn publish(&self, events: &[ChangeEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        for event in events {
            let body = serde_json::to_string(event)
                .map_err(|e| ArcaError::Notify(format!("event encoding failed: {e}")))?;

            self.client
                .publish()
                .topic_arn(&self.topic_arn)
                .message(body)
                .send()
                .await
                .map_err(|e| ArcaError::Notify(format!("publish failed: {e}")))?;
        }

        tracing::info!(count = events.len(), topic = %self.topic_arn, "Published change events");

        Ok(())
    }
}
