//! Destination path derivation
//!
//! Every DR object gets a deterministic forward-slash path inside its owning
//! OCFL object:
//!
//! ```text
//! {ioRef}[/{repGroup}][/{coRef}][/{genType}][/g{genVersion}]/{filename}
//! ```
//!
//! Optional segments appear only when defined. These paths are compared
//! byte-for-byte against stored state, so the rendering here is part of the
//! layout contract.

use crate::domain::entity::{GenerationType, RepresentationGroup};
use crate::domain::ids::EntityRef;

/// Filename of a composed information object envelope
pub const IO_METADATA_FILENAME: &str = "IO_Metadata.xml";

/// Filename of a composed content object envelope
pub const CO_METADATA_FILENAME: &str = "CO_Metadata.xml";

/// Destination of an information object's metadata envelope
pub fn io_metadata_destination(io_ref: &EntityRef) -> String {
    format!("{io_ref}/{IO_METADATA_FILENAME}")
}

/// Destination of a content object's metadata envelope
pub fn co_metadata_destination(
    io_ref: &EntityRef,
    group: Option<&RepresentationGroup>,
    co_ref: &EntityRef,
) -> String {
    let mut segments = vec![io_ref.to_string()];
    if let Some(group) = group {
        segments.push(group.label());
    }
    segments.push(co_ref.to_string());
    segments.push(CO_METADATA_FILENAME.to_string());
    segments.join("/")
}

/// Destination of a bitstream payload
pub fn bitstream_destination(
    io_ref: &EntityRef,
    group: Option<&RepresentationGroup>,
    co_ref: &EntityRef,
    generation_type: GenerationType,
    generation_version: u32,
    name: &str,
) -> String {
    let mut segments = vec![io_ref.to_string()];
    if let Some(group) = group {
        segments.push(group.label());
    }
    segments.push(co_ref.to_string());
    segments.push(generation_type.path_segment().to_string());
    segments.push(format!("g{generation_version}"));
    segments.push(name.to_string());
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::RepresentationType;
    use std::str::FromStr;

    fn io_ref() -> EntityRef {
        EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap()
    }

    fn co_ref() -> EntityRef {
        EntityRef::from_str("0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4").unwrap()
    }

    #[test]
    fn test_io_metadata_destination() {
        assert_eq!(
            io_metadata_destination(&io_ref()),
            "7d44b88c-4199-4bad-97dc-d78268e01398/IO_Metadata.xml"
        );
    }

    #[test]
    fn test_co_metadata_destination_grouped() {
        let group = RepresentationGroup::new(RepresentationType::Preservation, 1);
        assert_eq!(
            co_metadata_destination(&io_ref(), Some(&group), &co_ref()),
            "7d44b88c-4199-4bad-97dc-d78268e01398/Preservation_1/0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4/CO_Metadata.xml"
        );
    }

    #[test]
    fn test_co_metadata_destination_ungrouped() {
        assert_eq!(
            co_metadata_destination(&io_ref(), None, &co_ref()),
            "7d44b88c-4199-4bad-97dc-d78268e01398/0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4/CO_Metadata.xml"
        );
    }

    #[test]
    fn test_bitstream_destination() {
        let group = RepresentationGroup::new(RepresentationType::Access, 2);
        assert_eq!(
            bitstream_destination(
                &io_ref(),
                Some(&group),
                &co_ref(),
                GenerationType::Original,
                1,
                "0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.tif"
            ),
            "7d44b88c-4199-4bad-97dc-d78268e01398/Access_2/0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4/original/g1/0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4.tif"
        );
    }

    #[test]
    fn test_destination_deterministic() {
        let a = bitstream_destination(&io_ref(), None, &co_ref(), GenerationType::Derived, 3, "x.pdf");
        let b = bitstream_destination(&io_ref(), None, &co_ref(), GenerationType::Derived, 3, "x.pdf");
        assert_eq!(a, b);
        assert!(a.ends_with("/derived/g3/x.pdf"));
    }
}
