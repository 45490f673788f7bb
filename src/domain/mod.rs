//! Core domain types and models
//!
//! Everything the pipeline passes between components lives here: identifiers,
//! the entity graph, decoded messages, DR objects, change events, and the
//! crate-wide error and result types.

pub mod dr_object;
pub mod entity;
pub mod errors;
pub mod event;
pub mod ids;
pub mod message;
pub mod result;

pub use dr_object::{DrObject, FileObject, MetadataObject, StagedWrite};
pub use entity::{
    BitstreamInfo, Entity, EntityKind, EntityMetadata, Fixity, GenerationType, Identifier,
    MetadataDetail, RepresentationGroup, RepresentationType, XmlFragment,
};
pub use errors::{ArcaError, InvariantError, StorageError, UpstreamError};
pub use event::{ChangeEvent, EventObjectType, EventStatus};
pub use ids::{EntityRef, SourceId};
pub use message::{ChangeMessage, MessageCarrier};
pub use result::Result;
