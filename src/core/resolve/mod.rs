//! Entity resolution
//!
//! Expands a decoded change message into the DR objects to persist: one
//! metadata object per entity, plus one file object per bitstream of a
//! content object. All upstream lookups go through the entity client; any
//! invariant violation aborts the batch.

use crate::adapters::preservica::EntityClient;
use crate::core::compose::Composer;
use crate::core::paths;
use crate::domain::entity::{
    BitstreamInfo, Entity, EntityKind, RepresentationGroup,
};
use crate::domain::errors::{InvariantError, UpstreamError};
use crate::domain::ids::EntityRef;
use crate::domain::message::ChangeMessage;
use crate::domain::{DrObject, FileObject, MetadataObject, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Expands change messages into DR objects
pub struct EntityResolver {
    client: Arc<dyn EntityClient>,
    composer: Composer,
}

impl EntityResolver {
    pub fn new(client: Arc<dyn EntityClient>, composer: Composer) -> Self {
        Self { client, composer }
    }

    /// Resolve one message into its DR objects
    pub async fn resolve(&self, message: &ChangeMessage) -> Result<Vec<DrObject>> {
        match message {
            ChangeMessage::InformationObject { entity_ref } => {
                self.resolve_information_object(entity_ref).await
            }
            ChangeMessage::ContentObject { entity_ref } => {
                self.resolve_content_object(entity_ref).await
            }
        }
    }

    /// An IO message yields exactly one metadata object at the object root
    async fn resolve_information_object(&self, io_ref: &EntityRef) -> Result<Vec<DrObject>> {
        tracing::debug!(io_ref = %io_ref, "Resolving information object");

        let entity = self
            .client
            .entity_by_type_and_ref(EntityKind::InformationObject, io_ref, None)
            .await?;
        expect_kind(&entity, EntityKind::InformationObject)?;
        let metadata = self.client.metadata_for_entity(&entity).await?;
        let envelope = self.composer.compose(&metadata)?;

        let source_id = metadata.source_id(entity.entity_ref)?;

        Ok(vec![DrObject::Metadata(MetadataObject {
            io_ref: entity.entity_ref,
            representation_group: None,
            filename: paths::IO_METADATA_FILENAME.to_string(),
            digest: envelope.digest,
            document: envelope.document,
            destination_path: paths::io_metadata_destination(&entity.entity_ref),
            identifier: source_id.into_inner(),
        })])
    }

    /// A CO message yields one metadata object plus one file object per
    /// bitstream, all placed under the owning information object
    async fn resolve_content_object(&self, co_ref: &EntityRef) -> Result<Vec<DrObject>> {
        tracing::debug!(co_ref = %co_ref, "Resolving content object");

        let bitstreams = self.client.bitstream_info(co_ref).await?;
        let first = bitstreams.first().ok_or_else(|| {
            UpstreamError::InvalidResponse(format!("content object {co_ref} has no bitstreams"))
        })?;
        let parent_hint = first.parent_ref;

        let entity = self
            .client
            .entity_by_type_and_ref(EntityKind::ContentObject, co_ref, Some(&parent_hint))
            .await?;
        expect_kind(&entity, EntityKind::ContentObject)?;
        let io_ref = entity.parent.ok_or(InvariantError::MissingParent {
            co_ref: entity.entity_ref,
        })?;

        let group = self.representation_group(&io_ref, co_ref).await?;
        let co_identifier = bitstream_identifier(co_ref, &bitstreams)?;

        let metadata = self.client.metadata_for_entity(&entity).await?;
        let envelope = self.composer.compose(&metadata)?;

        let mut objects = vec![DrObject::Metadata(MetadataObject {
            io_ref,
            representation_group: group,
            filename: paths::CO_METADATA_FILENAME.to_string(),
            digest: envelope.digest,
            document: envelope.document,
            destination_path: paths::co_metadata_destination(&io_ref, group.as_ref(), co_ref),
            identifier: co_identifier.to_string(),
        })];

        for bitstream in &bitstreams {
            objects.push(DrObject::File(FileObject {
                io_ref,
                filename: bitstream.name.clone(),
                fixity: bitstream.fixity.value.clone(),
                url: bitstream.url.clone(),
                destination_path: paths::bitstream_destination(
                    &io_ref,
                    group.as_ref(),
                    co_ref,
                    bitstream.generation_type,
                    bitstream.generation_version,
                    &bitstream.name,
                ),
                identifier: bitstream
                    .identifier()
                    .map_err(|_| InvariantError::BitstreamIdentityMismatch {
                        co_ref: *co_ref,
                        found: 0,
                    })?,
            }));
        }

        Ok(objects)
    }

    /// Finds the representation group the content object belongs to
    ///
    /// Zero groups leaves the object ungrouped; two or more is fatal.
    async fn representation_group(
        &self,
        io_ref: &EntityRef,
        co_ref: &EntityRef,
    ) -> Result<Option<RepresentationGroup>> {
        let urls = self.client.representation_urls_for_io(io_ref).await?;

        let mut matches: BTreeMap<String, RepresentationGroup> = BTreeMap::new();
        for url in &urls {
            let group = RepresentationGroup::from_url(url)
                .map_err(UpstreamError::InvalidResponse)?;
            let members = self
                .client
                .content_objects_from_representation(io_ref, &group)
                .await?;
            if members.contains(co_ref) {
                matches.insert(group.label(), group);
            }
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_values().next()),
            _ => Err(InvariantError::MultipleRepresentationGroups {
                co_ref: *co_ref,
                groups: matches.into_keys().collect::<Vec<_>>().join(", "),
            }
            .into()),
        }
    }
}

/// Derives the single identifier all bitstream names must agree on
fn bitstream_identifier(
    co_ref: &EntityRef,
    bitstreams: &[BitstreamInfo],
) -> Result<EntityRef> {
    let mut identifiers = BTreeSet::new();
    for bitstream in bitstreams {
        match bitstream.identifier() {
            Ok(id) => {
                identifiers.insert(id);
            }
            Err(_) => {
                return Err(InvariantError::BitstreamIdentityMismatch {
                    co_ref: *co_ref,
                    found: 0,
                }
                .into())
            }
        }
    }

    if identifiers.len() != 1 {
        return Err(InvariantError::BitstreamIdentityMismatch {
            co_ref: *co_ref,
            found: identifiers.len(),
        }
        .into());
    }
    Ok(identifiers.into_iter().next().expect("singleton"))
}

fn expect_kind(entity: &Entity, kind: EntityKind) -> Result<()> {
    if entity.kind != kind {
        return Err(UpstreamError::InvalidResponse(format!(
            "expected a {} entity, got {}",
            kind.short_code(),
            entity.kind.short_code()
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Fixity, GenerationType};
    use std::str::FromStr;

    fn co_ref() -> EntityRef {
        EntityRef::from_str("0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4").unwrap()
    }

    fn bitstream(name: &str) -> BitstreamInfo {
        BitstreamInfo {
            name: name.to_string(),
            fixity: Fixity {
                algorithm: "SHA256".to_string(),
                value: "d34db33f".to_string(),
            },
            url: "https://x/content".to_string(),
            generation_type: GenerationType::Original,
            generation_version: 1,
            parent_ref: EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap(),
        }
    }

    #[test]
    fn test_bitstream_identifier_agreement() {
        let bitstreams = vec![
            bitstream("0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.tif"),
            bitstream("0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.pdf"),
        ];
        let id = bitstream_identifier(&co_ref(), &bitstreams).unwrap();
        assert_eq!(id, co_ref());
    }

    #[test]
    fn test_bitstream_identifier_disagreement_fails() {
        let bitstreams = vec![
            bitstream("0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.tif"),
            bitstream("7d44b88c-4199-4bad-97dc-d78268e01398.tif"),
        ];
        let err = bitstream_identifier(&co_ref(), &bitstreams).unwrap_err();
        assert!(matches!(
            err,
            crate::domain::ArcaError::Invariant(InvariantError::BitstreamIdentityMismatch {
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_bitstream_identifier_unparseable_fails() {
        let bitstreams = vec![bitstream("scan-page-1.tif")];
        assert!(bitstream_identifier(&co_ref(), &bitstreams).is_err());
    }

    #[test]
    fn test_expect_kind() {
        let entity = Entity {
            entity_ref: co_ref(),
            kind: EntityKind::ContentObject,
            parent: None,
        };
        assert!(expect_kind(&entity, EntityKind::ContentObject).is_ok());
        assert!(expect_kind(&entity, EntityKind::InformationObject).is_err());
    }
}
