//! SQS implementation of the queue client

use super::QueueClient;
use crate::config::QueueConfig;
use crate::domain::errors::ArcaError;
use crate::domain::message::MessageCarrier;
use crate::domain::Result;
use async_trait::async_trait;
use aws_sdk_sqs::Client;

/// Queue client backed by Amazon SQS
pub struct SqsQueueClient {
    client: Client,
    queue_url: String,
    wait_time_seconds: i32,
    max_messages: i32,
}

impl SqsQueueClient {
    /// Create a queue client from a shared AWS configuration
    pub fn new(aws_config: &aws_config::SdkConfig, config: &QueueConfig) -> Self {
        Self {
            client: Client::new(aws_config),
            queue_url: config.sqs_queue_url.clone(),
            wait_time_seconds: config.wait_time_seconds as i32,
            max_messages: config.max_messages as i32,
        }
    }

    /// The queue URL this client reads from
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn receive(&self) -> Result<Vec<MessageCarrier>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(self.max_messages)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .map_err(|e| ArcaError::Queue(format!("receive failed: {e}")))?;

        let carriers = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| {
                let receipt_handle = message.receipt_handle?;
                let body = message.body.unwrap_or_default();
                let message_id = message.message_id.unwrap_or_default();
                Some(MessageCarrier::new(message_id, receipt_handle, body))
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = carriers.len(), "Received message carriers");

        Ok(carriers)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| ArcaError::Queue(format!("delete failed: {e}")))?;
        Ok(())
    }
}
