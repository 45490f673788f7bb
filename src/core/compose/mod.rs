//! Metadata envelope composition
//!
//! Assembles the per-entity XIP envelope from upstream fragments, validates
//! it, and digests the exact serialized bytes. The whitespace between
//! children is a fixed text node; the digest is taken over the serialized
//! string, so the separator must never change without re-digesting
//! previously committed envelopes.

use crate::adapters::xml::validator::XIP_NAMESPACE;
use crate::adapters::xml::EnvelopeValidator;
use crate::domain::entity::{EntityMetadata, MetadataDetail};
use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Fixed whitespace text node between consecutive children of the root
const CHILD_SEPARATOR: &str = "\n          ";

/// A composed, validated envelope and the digest of its exact bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEnvelope {
    /// Serialized envelope; staged bytes are exactly these
    pub document: String,

    /// Lowercase hex SHA-256 of `document`
    pub digest: String,
}

/// Composes envelopes and validates them against the schema
pub struct Composer {
    validator: Arc<dyn EnvelopeValidator>,
}

impl Composer {
    pub fn new(validator: Arc<dyn EnvelopeValidator>) -> Self {
        Self { validator }
    }

    /// Compose, validate and digest the envelope for one entity
    ///
    /// Children appear in a fixed order: the entity node, then
    /// representation nodes (IO) or generation and bitstream nodes (CO),
    /// then identifiers, links, metadata nodes and event actions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ArcaError::Schema`] when the serialized
    /// envelope fails validation.
    pub fn compose(&self, metadata: &EntityMetadata) -> Result<ComposedEnvelope> {
        let document = serialize_envelope(metadata);
        self.validator.validate(&document)?;

        let digest = hex::encode(Sha256::digest(document.as_bytes()));
        Ok(ComposedEnvelope { document, digest })
    }
}

fn serialize_envelope(metadata: &EntityMetadata) -> String {
    let mut children: Vec<&str> = Vec::new();
    children.push(metadata.entity_node.as_str());

    match &metadata.detail {
        MetadataDetail::Io { representations } => {
            children.extend(representations.iter().map(|f| f.as_str()));
        }
        MetadataDetail::Co {
            generations,
            bitstreams,
        } => {
            children.extend(generations.iter().map(|f| f.as_str()));
            children.extend(bitstreams.iter().map(|f| f.as_str()));
        }
    }

    children.extend(metadata.identifiers.iter().map(|id| id.fragment.as_str()));
    children.extend(metadata.links.iter().map(|f| f.as_str()));
    children.extend(metadata.metadata_nodes.iter().map(|f| f.as_str()));
    children.extend(metadata.event_actions.iter().map(|f| f.as_str()));

    let mut document = format!("<XIP xmlns=\"{XIP_NAMESPACE}\">");
    for child in children {
        document.push_str(CHILD_SEPARATOR);
        document.push_str(child);
    }
    document.push_str("\n</XIP>");
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::xml::XipValidator;
    use crate::domain::entity::{Identifier, XmlFragment};

    fn composer() -> Composer {
        Composer::new(Arc::new(XipValidator::new()))
    }

    fn io_metadata() -> EntityMetadata {
        EntityMetadata {
            entity_node: XmlFragment::new("<InformationObject><Ref>abc</Ref></InformationObject>"),
            detail: MetadataDetail::Io {
                representations: vec![XmlFragment::new("<Representation><Name>Preservation</Name></Representation>")],
            },
            identifiers: vec![Identifier {
                id_type: "SourceID".to_string(),
                value: "SRC-1".to_string(),
                fragment: XmlFragment::new(
                    "<Identifier><Type>SourceID</Type><Value>SRC-1</Value></Identifier>",
                ),
            }],
            links: vec![XmlFragment::new("<Link><To>xyz</To></Link>")],
            metadata_nodes: vec![],
            event_actions: vec![XmlFragment::new("<EventAction><Event>Ingest</Event></EventAction>")],
        }
    }

    #[test]
    fn test_envelope_child_order_and_separator() {
        let envelope = composer().compose(&io_metadata()).unwrap();
        let expected = concat!(
            "<XIP xmlns=\"http://preservica.com/XIP/v7.0\">",
            "\n          <InformationObject><Ref>abc</Ref></InformationObject>",
            "\n          <Representation><Name>Preservation</Name></Representation>",
            "\n          <Identifier><Type>SourceID</Type><Value>SRC-1</Value></Identifier>",
            "\n          <Link><To>xyz</To></Link>",
            "\n          <EventAction><Event>Ingest</Event></EventAction>",
            "\n</XIP>",
        );
        assert_eq!(envelope.document, expected);
    }

    #[test]
    fn test_separator_is_newline_and_ten_spaces() {
        assert_eq!(CHILD_SEPARATOR.len(), 11);
        assert!(CHILD_SEPARATOR.starts_with('\n'));
        assert_eq!(&CHILD_SEPARATOR[1..], "          ");
    }

    #[test]
    fn test_digest_is_over_exact_bytes() {
        let envelope = composer().compose(&io_metadata()).unwrap();
        let recomputed = hex::encode(Sha256::digest(envelope.document.as_bytes()));
        assert_eq!(envelope.digest, recomputed);
        assert_eq!(envelope.digest.len(), 64);
    }

    #[test]
    fn test_digest_changes_with_content() {
        let a = composer().compose(&io_metadata()).unwrap();

        let mut changed = io_metadata();
        changed.identifiers.push(Identifier {
            id_type: "Accession".to_string(),
            value: "ACC-2".to_string(),
            fragment: XmlFragment::new(
                "<Identifier><Type>Accession</Type><Value>ACC-2</Value></Identifier>",
            ),
        });
        let b = composer().compose(&changed).unwrap();

        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_co_envelope_orders_generations_before_bitstreams() {
        let metadata = EntityMetadata {
            entity_node: XmlFragment::new("<ContentObject/>"),
            detail: MetadataDetail::Co {
                generations: vec![XmlFragment::new("<Generation><Active>true</Active></Generation>")],
                bitstreams: vec![XmlFragment::new("<Bitstream><Name>a.tif</Name></Bitstream>")],
            },
            identifiers: vec![],
            links: vec![],
            metadata_nodes: vec![],
            event_actions: vec![],
        };
        let envelope = composer().compose(&metadata).unwrap();
        let generation_at = envelope.document.find("<Generation>").unwrap();
        let bitstream_at = envelope.document.find("<Bitstream>").unwrap();
        assert!(generation_at < bitstream_at);
    }

    #[test]
    fn test_malformed_fragment_fails_validation() {
        let metadata = EntityMetadata {
            entity_node: XmlFragment::new("<ContentObject><Unclosed>"),
            detail: MetadataDetail::Co {
                generations: vec![],
                bitstreams: vec![],
            },
            identifiers: vec![],
            links: vec![],
            metadata_nodes: vec![],
            event_actions: vec![],
        };
        assert!(composer().compose(&metadata).is_err());
    }
}
