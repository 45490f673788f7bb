//! Change event publisher adapter
//!
//! The [`EventPublisher`] trait is the pipeline's view of the hosted
//! pub/sub topic; [`SnsEventPublisher`] is the production implementation.

pub mod sns;

use crate::domain::event::ChangeEvent;
use crate::domain::Result;
use async_trait::async_trait;

pub use sns::SnsEventPublisher;

/// Trait for the downstream change event topic
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a list of change events
    ///
    /// Implementations must treat an empty list as a no-op. Downstream
    /// consumers tolerate duplicates, so publication after a crash may
    /// repeat events.
    async fn publish(&self, events: &[ChangeEvent]) -> Result<()>;
}
