//! Entity client trait definition
//!
//! This trait abstracts the upstream preservation API. The pipeline only
//! ever talks to it, so tests substitute in-memory implementations and a
//! different vendor could be plugged in behind the same seam.

use crate::domain::entity::{BitstreamInfo, Entity, EntityKind, EntityMetadata, RepresentationGroup};
use crate::domain::ids::EntityRef;
use crate::domain::Result;
use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Trait for upstream preservation API implementations
///
/// All methods map 1:1 onto upstream endpoints. Implementations convert
/// transport errors into [`crate::domain::UpstreamError`] at this boundary.
#[async_trait]
pub trait EntityClient: Send + Sync {
    /// Fetch an entity descriptor by kind and reference
    ///
    /// `parent_hint` carries the owning information object when the caller
    /// already knows it; some upstream deployments need it to route the
    /// lookup.
    async fn entity_by_type_and_ref(
        &self,
        kind: EntityKind,
        entity_ref: &EntityRef,
        parent_hint: Option<&EntityRef>,
    ) -> Result<Entity>;

    /// Fetch the bitstream descriptors of a content object
    ///
    /// Every content object owns at least one bitstream; derived generations
    /// add more.
    async fn bitstream_info(&self, co_ref: &EntityRef) -> Result<Vec<BitstreamInfo>>;

    /// Fetch the metadata tree fragments for an entity
    async fn metadata_for_entity(&self, entity: &Entity) -> Result<EntityMetadata>;

    /// List the representation URLs of an information object
    ///
    /// Each URL's trailing two path segments encode the representation type
    /// and 1-based index.
    async fn representation_urls_for_io(&self, io_ref: &EntityRef) -> Result<Vec<String>>;

    /// List the content object references inside one representation
    async fn content_objects_from_representation(
        &self,
        io_ref: &EntityRef,
        group: &RepresentationGroup,
    ) -> Result<Vec<EntityRef>>;

    /// Stream a bitstream payload into the provided sink
    ///
    /// Bytes flow chunk by chunk with back-pressure; dropping the future
    /// aborts the transfer.
    async fn stream_bitstream(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<()>;
}
