//! Change events published after commit

use crate::domain::ids::EntityRef;
use serde::{Deserialize, Serialize};

/// What kind of file the event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventObjectType {
    Bitstream,
    Metadata,
}

/// Whether the file was new or replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Created,
    Updated,
}

/// A structured change event, one per committed DR object
///
/// `entityType` is the constant string `"CO"` for every event, including IO
/// metadata updates. Downstream consumers depend on the current rendering,
/// so it is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "entityType")]
    entity_type: String,

    #[serde(rename = "ioRef")]
    pub io_ref: EntityRef,

    #[serde(rename = "objectType")]
    pub object_type: EventObjectType,

    pub status: EventStatus,

    /// String-rendered identifier: the bitstream UUID or the SourceID
    #[serde(rename = "bitstreamName")]
    pub bitstream_name: String,
}

impl ChangeEvent {
    pub fn new(
        io_ref: EntityRef,
        object_type: EventObjectType,
        status: EventStatus,
        identifier: String,
    ) -> Self {
        Self {
            entity_type: "CO".to_string(),
            io_ref,
            object_type,
            status,
            bitstream_name: identifier,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_event_json_field_names() {
        let event = ChangeEvent::new(
            EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap(),
            EventObjectType::Metadata,
            EventStatus::Created,
            "SRC-1".to_string(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["entityType"], "CO");
        assert_eq!(json["ioRef"], "7d44b88c-4199-4bad-97dc-d78268e01398");
        assert_eq!(json["objectType"], "Metadata");
        assert_eq!(json["status"], "Created");
        assert_eq!(json["bitstreamName"], "SRC-1");
    }

    #[test]
    fn test_entity_type_constant_for_bitstreams() {
        let event = ChangeEvent::new(
            EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap(),
            EventObjectType::Bitstream,
            EventStatus::Updated,
            "0f4e9a6c-9b3e-4a2f-8d11-55c0a1b2c3d4".to_string(),
        );
        assert_eq!(event.entity_type(), "CO");
    }
}
