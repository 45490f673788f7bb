//! Entity model for the upstream preservation repository
//!
//! These are closed sum types mirroring the upstream entity graph: an
//! information object (IO) owns content objects (CO) through representation
//! groups, and each content object owns one or more bitstreams.

use crate::domain::errors::InvariantError;
use crate::domain::ids::{EntityRef, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a logical archival entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Logical intellectual unit
    InformationObject,
    /// Concrete manifestation owned by an information object
    ContentObject,
}

impl EntityKind {
    /// Short code used by the upstream API ("IO" / "CO")
    pub fn short_code(&self) -> &'static str {
        match self {
            EntityKind::InformationObject => "IO",
            EntityKind::ContentObject => "CO",
        }
    }
}

/// An entity descriptor as returned by the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Reference naming this entity
    pub entity_ref: EntityRef,

    /// Entity kind
    pub kind: EntityKind,

    /// Owning information object, present on content objects
    ///
    /// Held as a reference, never as an embedded entity; group membership
    /// lookups go through the entity client.
    pub parent: Option<EntityRef>,
}

/// Representation type of a content object group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepresentationType {
    Preservation,
    Access,
}

impl fmt::Display for RepresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationType::Preservation => write!(f, "Preservation"),
            RepresentationType::Access => write!(f, "Access"),
        }
    }
}

impl FromStr for RepresentationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preservation" => Ok(RepresentationType::Preservation),
            "access" => Ok(RepresentationType::Access),
            other => Err(format!("Unknown representation type '{other}'")),
        }
    }
}

/// A (type, index) representation group of an information object
///
/// Groups are indexed from 1. The label (`Preservation_1`) is a destination
/// path segment, so its rendering is part of the layout contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepresentationGroup {
    pub rep_type: RepresentationType,
    pub index: u32,
}

impl RepresentationGroup {
    pub fn new(rep_type: RepresentationType, index: u32) -> Self {
        Self { rep_type, index }
    }

    /// Parses a group from a representation URL
    ///
    /// The upstream renders representations as URLs whose trailing two path
    /// segments are the type and the 1-based index, e.g.
    /// `.../representations/preservation/1`.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let trimmed = url.trim_end_matches('/');
        let mut segments = trimmed.rsplit('/');
        let index_seg = segments
            .next()
            .ok_or_else(|| format!("Representation URL '{url}' has no index segment"))?;
        let type_seg = segments
            .next()
            .ok_or_else(|| format!("Representation URL '{url}' has no type segment"))?;

        let index: u32 = index_seg
            .parse()
            .map_err(|_| format!("Representation URL '{url}' has non-numeric index '{index_seg}'"))?;
        if index == 0 {
            return Err(format!("Representation URL '{url}' has zero index"));
        }
        let rep_type = RepresentationType::from_str(type_seg)
            .map_err(|e| format!("Representation URL '{url}': {e}"))?;

        Ok(Self { rep_type, index })
    }

    /// Destination path segment, e.g. `Preservation_1`
    pub fn label(&self) -> String {
        format!("{}_{}", self.rep_type, self.index)
    }
}

impl fmt::Display for RepresentationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a bitstream generation came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationType {
    Original,
    Derived,
}

impl GenerationType {
    /// Lowercase destination path segment
    pub fn path_segment(&self) -> &'static str {
        match self {
            GenerationType::Original => "original",
            GenerationType::Derived => "derived",
        }
    }
}

impl FromStr for GenerationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(GenerationType::Original),
            "derived" => Ok(GenerationType::Derived),
            other => Err(format!("Unknown generation type '{other}'")),
        }
    }
}

/// Declared digest of a bitstream as recorded upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixity {
    /// Digest algorithm name, `SHA256` for every supported object
    pub algorithm: String,
    /// Lowercase hex digest
    pub value: String,
}

/// Per-bitstream payload descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitstreamInfo {
    /// Original filename; embeds the bitstream UUID before the extension
    pub name: String,

    /// Declared SHA-256 of the payload
    pub fixity: Fixity,

    /// Fetch location of the payload bytes
    pub url: String,

    /// Original or Derived
    pub generation_type: GenerationType,

    /// 1-based generation version
    pub generation_version: u32,

    /// The information object owning this bitstream's content object
    pub parent_ref: EntityRef,
}

impl BitstreamInfo {
    /// The bitstream identifier embedded in the filename
    ///
    /// Strips the final dot-suffix and parses the remainder as a UUID.
    pub fn identifier(&self) -> Result<EntityRef, String> {
        let stem = strip_extension(&self.name);
        EntityRef::parse(stem)
    }
}

/// Strips the final dot-suffix from a filename, if any
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// A serialized XML fragment received from the upstream API
///
/// Fragments are carried verbatim into the composed envelope, so their bytes
/// are load-bearing for the digest contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XmlFragment(String);

impl XmlFragment {
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An identifier attached to an entity
///
/// Carries both the parsed (type, value) pair used for SourceID extraction
/// and the raw fragment used verbatim in the composed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub id_type: String,
    pub value: String,
    pub fragment: XmlFragment,
}

/// Type-specific metadata fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataDetail {
    /// Information object metadata: one node per representation
    Io { representations: Vec<XmlFragment> },
    /// Content object metadata: generation nodes, then bitstream nodes
    Co {
        generations: Vec<XmlFragment>,
        bitstreams: Vec<XmlFragment>,
    },
}

/// Upstream-provided metadata tree fragments for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    /// The entity node itself
    pub entity_node: XmlFragment,

    /// IO- or CO-specific fragments
    pub detail: MetadataDetail,

    /// Identifier fragments
    pub identifiers: Vec<Identifier>,

    /// Link fragments
    pub links: Vec<XmlFragment>,

    /// Descriptive metadata fragments
    pub metadata_nodes: Vec<XmlFragment>,

    /// Event action fragments
    pub event_actions: Vec<XmlFragment>,
}

impl EntityMetadata {
    /// Extracts the mandatory SourceID identifier
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::MissingSourceId`] when no identifier of
    /// type `SourceID` is present.
    pub fn source_id(&self, io_ref: EntityRef) -> Result<SourceId, InvariantError> {
        self.identifiers
            .iter()
            .find(|id| id.id_type == "SourceID")
            .and_then(|id| SourceId::new(id.value.clone()).ok())
            .ok_or(InvariantError::MissingSourceId { io_ref })
    }
}
