//! Disaster-recovery objects: the unit of replication work
//!
//! A resolved message expands into one or more DR objects, each naming the
//! OCFL object it belongs to, its destination path inside that object, and
//! the digest its payload is expected to have.

use crate::domain::entity::RepresentationGroup;
use crate::domain::event::EventObjectType;
use crate::domain::ids::EntityRef;

/// A bitstream payload to replicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObject {
    /// OCFL object identifier (the owning information object)
    pub io_ref: EntityRef,

    /// Original filename
    pub filename: String,

    /// Declared hex SHA-256 of the payload
    pub fixity: String,

    /// Fetch location
    pub url: String,

    /// Forward-slash path inside the OCFL object
    pub destination_path: String,

    /// Bitstream UUID parsed from the filename
    pub identifier: EntityRef,
}

/// A composed metadata envelope to replicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataObject {
    /// OCFL object identifier (the owning information object)
    pub io_ref: EntityRef,

    /// Representation group, absent for IO metadata and ungrouped COs
    pub representation_group: Option<RepresentationGroup>,

    /// `IO_Metadata.xml` or `CO_Metadata.xml`
    pub filename: String,

    /// Hex SHA-256 of the serialized envelope
    pub digest: String,

    /// The serialized envelope; staged bytes are exactly these
    pub document: String,

    /// Forward-slash path inside the OCFL object
    pub destination_path: String,

    /// SourceID for IO metadata, the bitstream UUID for CO metadata
    pub identifier: String,
}

/// The unit of work handed to the local store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrObject {
    File(FileObject),
    Metadata(MetadataObject),
}

impl DrObject {
    /// The OCFL object this DR object belongs to
    pub fn io_ref(&self) -> EntityRef {
        match self {
            DrObject::File(f) => f.io_ref,
            DrObject::Metadata(m) => m.io_ref,
        }
    }

    /// Destination path inside the owning OCFL object
    pub fn destination_path(&self) -> &str {
        match self {
            DrObject::File(f) => &f.destination_path,
            DrObject::Metadata(m) => &m.destination_path,
        }
    }

    /// The hex SHA-256 the stored payload is expected to have
    ///
    /// Declared fixity for file objects, the composed digest for metadata
    /// objects. Classification compares this against the OCFL manifest.
    pub fn expected_digest(&self) -> &str {
        match self {
            DrObject::File(f) => &f.fixity,
            DrObject::Metadata(m) => &m.digest,
        }
    }

    /// String-rendered identifier carried into published events
    pub fn identifier_string(&self) -> String {
        match self {
            DrObject::File(f) => f.identifier.to_string(),
            DrObject::Metadata(m) => m.identifier.clone(),
        }
    }

    /// Event object type for this DR object
    pub fn event_object_type(&self) -> EventObjectType {
        match self {
            DrObject::File(_) => EventObjectType::Bitstream,
            DrObject::Metadata(_) => EventObjectType::Metadata,
        }
    }
}

/// A staged payload ready for commit
///
/// Produced by the staging transfer, consumed by the local store: the bytes
/// at `staging_path` belong at `destination_path` inside the owning OCFL
/// object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    /// String-rendered identifier, used for logging and event association
    pub id: String,

    /// Local path of the staged bytes
    pub staging_path: std::path::PathBuf,

    /// Forward-slash path inside the OCFL object
    pub destination_path: String,
}
