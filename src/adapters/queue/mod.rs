//! Source queue adapter
//!
//! The [`QueueClient`] trait is the pipeline's view of the hosted queue;
//! [`SqsQueueClient`] is the production implementation.

pub mod sqs;

use crate::domain::message::MessageCarrier;
use crate::domain::Result;
use async_trait::async_trait;

pub use sqs::SqsQueueClient;

/// Trait for the change notification queue
///
/// A single coordinator reads from the queue; carriers are deleted only
/// after a batch commits and publishes.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receive the next batch of message carriers
    ///
    /// Returns an empty list when no messages are currently visible.
    async fn receive(&self) -> Result<Vec<MessageCarrier>>;

    /// Delete one message by its receipt handle
    async fn delete(&self, receipt_handle: &str) -> Result<()>;
}
