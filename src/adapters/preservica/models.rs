//! Wire models for the upstream entity API
//!
//! JSON response shapes plus the conversion into domain types. Metadata
//! fragments arrive as serialized XML strings and are carried verbatim;
//! identifier fragments are additionally parsed so the pipeline can extract
//! the SourceID without touching XML again.

use crate::domain::entity::{
    BitstreamInfo, Entity, EntityKind, EntityMetadata, Fixity, GenerationType, Identifier,
    MetadataDetail, XmlFragment,
};
use crate::domain::errors::UpstreamError;
use crate::domain::ids::EntityRef;
use serde::Deserialize;
use std::str::FromStr;

/// Entity descriptor response
#[derive(Debug, Deserialize)]
pub struct EntityDto {
    #[serde(rename = "ref")]
    pub entity_ref: EntityRef,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub parent: Option<EntityRef>,
}

impl EntityDto {
    pub fn into_domain(self) -> Result<Entity, UpstreamError> {
        let kind = match self.kind.as_str() {
            "IO" => EntityKind::InformationObject,
            "CO" => EntityKind::ContentObject,
            other => {
                return Err(UpstreamError::InvalidResponse(format!(
                    "Unknown entity type '{other}'"
                )))
            }
        };
        Ok(Entity {
            entity_ref: self.entity_ref,
            kind,
            parent: self.parent,
        })
    }
}

/// Fixity descriptor inside a bitstream response
#[derive(Debug, Deserialize)]
pub struct FixityDto {
    pub algorithm: String,
    pub value: String,
}

/// Bitstream descriptor response
#[derive(Debug, Deserialize)]
pub struct BitstreamDto {
    pub name: String,
    pub fixity: FixityDto,
    pub url: String,

    #[serde(rename = "generationType")]
    pub generation_type: String,

    #[serde(rename = "generationVersion")]
    pub generation_version: u32,

    #[serde(rename = "parentRef")]
    pub parent_ref: EntityRef,
}

impl BitstreamDto {
    pub fn into_domain(self) -> Result<BitstreamInfo, UpstreamError> {
        let generation_type = GenerationType::from_str(&self.generation_type)
            .map_err(UpstreamError::InvalidResponse)?;
        Ok(BitstreamInfo {
            name: self.name,
            fixity: Fixity {
                algorithm: self.fixity.algorithm,
                value: self.fixity.value,
            },
            url: self.url,
            generation_type,
            generation_version: self.generation_version,
            parent_ref: self.parent_ref,
        })
    }
}

/// Bitstream list response
#[derive(Debug, Deserialize)]
pub struct BitstreamListDto {
    pub bitstreams: Vec<BitstreamDto>,
}

/// Representation URL list response
#[derive(Debug, Deserialize)]
pub struct RepresentationListDto {
    pub representations: Vec<String>,
}

/// Content object list response for one representation
#[derive(Debug, Deserialize)]
pub struct ContentObjectListDto {
    #[serde(rename = "contentObjects")]
    pub content_objects: Vec<EntityRef>,
}

/// Metadata fragments response
#[derive(Debug, Deserialize)]
pub struct MetadataDto {
    #[serde(rename = "entityNode")]
    pub entity_node: String,

    #[serde(default)]
    pub representations: Vec<String>,

    #[serde(default)]
    pub generations: Vec<String>,

    #[serde(default)]
    pub bitstreams: Vec<String>,

    #[serde(default)]
    pub identifiers: Vec<String>,

    #[serde(default)]
    pub links: Vec<String>,

    #[serde(rename = "metadataNodes", default)]
    pub metadata_nodes: Vec<String>,

    #[serde(rename = "eventActions", default)]
    pub event_actions: Vec<String>,
}

impl MetadataDto {
    pub fn into_domain(self, kind: EntityKind) -> Result<EntityMetadata, UpstreamError> {
        let detail = match kind {
            EntityKind::InformationObject => MetadataDetail::Io {
                representations: self.representations.into_iter().map(XmlFragment::new).collect(),
            },
            EntityKind::ContentObject => MetadataDetail::Co {
                generations: self.generations.into_iter().map(XmlFragment::new).collect(),
                bitstreams: self.bitstreams.into_iter().map(XmlFragment::new).collect(),
            },
        };

        let identifiers = self
            .identifiers
            .into_iter()
            .map(|fragment| parse_identifier(&fragment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EntityMetadata {
            entity_node: XmlFragment::new(self.entity_node),
            detail,
            identifiers,
            links: self.links.into_iter().map(XmlFragment::new).collect(),
            metadata_nodes: self.metadata_nodes.into_iter().map(XmlFragment::new).collect(),
            event_actions: self.event_actions.into_iter().map(XmlFragment::new).collect(),
        })
    }
}

/// Deserialized shape of an identifier fragment
#[derive(Debug, Deserialize)]
struct IdentifierNode {
    #[serde(rename = "Type")]
    id_type: String,

    #[serde(rename = "Value")]
    value: String,
}

/// Parses an identifier fragment into its (type, value) pair
///
/// The fragment itself is kept verbatim for envelope composition.
pub fn parse_identifier(fragment: &str) -> Result<Identifier, UpstreamError> {
    let node: IdentifierNode = quick_xml::de::from_str(fragment).map_err(|e| {
        UpstreamError::InvalidResponse(format!("Unparseable identifier fragment: {e}"))
    })?;
    Ok(Identifier {
        id_type: node.id_type,
        value: node.value,
        fragment: XmlFragment::new(fragment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier_fragment() {
        let fragment = "<Identifier><Type>SourceID</Type><Value>SRC-1</Value></Identifier>";
        let id = parse_identifier(fragment).unwrap();
        assert_eq!(id.id_type, "SourceID");
        assert_eq!(id.value, "SRC-1");
        assert_eq!(id.fragment.as_str(), fragment);
    }

    #[test]
    fn test_parse_identifier_rejects_garbage() {
        assert!(parse_identifier("<Identifier>").is_err());
        assert!(parse_identifier("not xml at all").is_err());
    }

    #[test]
    fn test_entity_dto_into_domain() {
        let dto: EntityDto = serde_json::from_str(
            r#"{"ref":"7d44b88c-4199-4bad-97dc-d78268e01398","type":"CO","parent":"0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4"}"#,
        )
        .unwrap();
        let entity = dto.into_domain().unwrap();
        assert_eq!(entity.kind, EntityKind::ContentObject);
        assert!(entity.parent.is_some());
    }

    #[test]
    fn test_entity_dto_unknown_kind_fails() {
        let dto: EntityDto = serde_json::from_str(
            r#"{"ref":"7d44b88c-4199-4bad-97dc-d78268e01398","type":"SO"}"#,
        )
        .unwrap();
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn test_metadata_dto_io_detail() {
        let dto: MetadataDto = serde_json::from_str(
            r#"{
                "entityNode": "<InformationObject/>",
                "representations": ["<Representation/>"],
                "identifiers": ["<Identifier><Type>SourceID</Type><Value>SRC-1</Value></Identifier>"]
            }"#,
        )
        .unwrap();
        let metadata = dto.into_domain(EntityKind::InformationObject).unwrap();
        assert!(matches!(
            metadata.detail,
            MetadataDetail::Io { ref representations } if representations.len() == 1
        ));
        assert_eq!(metadata.identifiers[0].value, "SRC-1");
    }

    #[test]
    fn test_bitstream_dto_into_domain() {
        let dto: BitstreamDto = serde_json::from_str(
            r#"{
                "name": "0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.tif",
                "fixity": {"algorithm": "SHA256", "value": "d34db33f"},
                "url": "https://x/bitstreams/1/content",
                "generationType": "Original",
                "generationVersion": 1,
                "parentRef": "7d44b88c-4199-4bad-97dc-d78268e01398"
            }"#,
        )
        .unwrap();
        let bs = dto.into_domain().unwrap();
        assert_eq!(bs.generation_type, GenerationType::Original);
        assert_eq!(bs.fixity.value, "d34db33f");
    }
}
