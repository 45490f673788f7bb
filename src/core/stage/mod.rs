//! Staging transfer
//!
//! Streams bitstream payloads and writes composed metadata into a per-batch
//! temporary directory, producing the staged writes the commit step
//! consumes. The directory is dropped with the batch, so aborted transfers
//! leave nothing behind.

use crate::adapters::preservica::EntityClient;
use crate::domain::dr_object::{DrObject, StagedWrite};
use crate::domain::errors::StorageError;
use crate::domain::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Concurrent transfers per batch
const TRANSFER_CONCURRENCY: usize = 8;

/// A per-batch staging area
///
/// Owns the temporary directory; dropping the area deletes every staged
/// file, staged or half-written.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh staging directory
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("arca-staging-")
            .tempdir()
            .map_err(|e| StorageError::Write(format!("staging dir: {e}")))?;
        Ok(Self { dir })
    }

    /// Stage one DR object
    ///
    /// File objects are streamed from their upstream URL; metadata objects
    /// are written from their already-serialized envelope bytes.
    pub async fn stage(
        &self,
        object: &DrObject,
        client: &dyn EntityClient,
    ) -> Result<StagedWrite> {
        let staging_path = self.dir.path().join(Uuid::new_v4().to_string());

        match object {
            DrObject::File(file) => {
                let mut sink = tokio::fs::File::create(&staging_path)
                    .await
                    .map_err(|e| StorageError::Write(e.to_string()))?;
                client.stream_bitstream(&file.url, &mut sink).await?;
                sink.flush()
                    .await
                    .map_err(|e| StorageError::Write(e.to_string()))?;

                tracing::debug!(
                    url = %file.url,
                    destination = %file.destination_path,
                    "Staged bitstream"
                );
            }
            DrObject::Metadata(metadata) => {
                tokio::fs::write(&staging_path, metadata.document.as_bytes())
                    .await
                    .map_err(|e| StorageError::Write(e.to_string()))?;

                tracing::debug!(
                    destination = %metadata.destination_path,
                    "Staged metadata envelope"
                );
            }
        }

        Ok(StagedWrite {
            id: object.identifier_string(),
            staging_path,
            destination_path: object.destination_path().to_string(),
        })
    }

    /// Stage a set of DR objects with bounded concurrency
    ///
    /// Returns the objects paired with their staged writes, preserving input
    /// order. The first failure drops the remaining transfers, cancelling
    /// whatever is in flight.
    pub async fn stage_all(
        &self,
        objects: Vec<DrObject>,
        client: Arc<dyn EntityClient>,
    ) -> Result<Vec<(DrObject, StagedWrite)>> {
        stream::iter(objects)
            .map(|object| {
                let client = client.clone();
                async move {
                    let write = self.stage(&object, client.as_ref()).await?;
                    Ok((object, write))
                }
            })
            .buffered(TRANSFER_CONCURRENCY)
            .try_collect()
            .await
    }
}
