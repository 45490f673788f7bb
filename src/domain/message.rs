//! Change notification messages
//!
//! Messages arrive as JSON with a `type` discriminator. Unrecognized or
//! malformed payloads decode to `None` and their carriers are left on the
//! queue for redelivery.

use crate::domain::ids::EntityRef;
use serde::{Deserialize, Serialize};

/// A decoded change notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChangeMessage {
    /// An information object was created or revised
    #[serde(rename = "InformationObjectMessage")]
    InformationObject {
        #[serde(rename = "ref")]
        entity_ref: EntityRef,
    },

    /// A content object was created or revised
    #[serde(rename = "ContentObjectMessage")]
    ContentObject {
        #[serde(rename = "ref")]
        entity_ref: EntityRef,
    },
}

impl ChangeMessage {
    /// Decodes a raw message body; absent on any decode failure
    pub fn decode(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Canonical text rendering used as the in-batch deduplication key
    pub fn canonical_text(&self) -> String {
        // Serialization of this enum cannot fail
        serde_json::to_string(self).expect("change message serializes")
    }

    /// The entity this message refers to
    pub fn entity_ref(&self) -> EntityRef {
        match self {
            ChangeMessage::InformationObject { entity_ref }
            | ChangeMessage::ContentObject { entity_ref } => *entity_ref,
        }
    }
}

/// A received queue message together with its acknowledgement handle
///
/// The decoded message is `None` when the body could not be parsed; such
/// carriers are never acknowledged.
#[derive(Debug, Clone)]
pub struct MessageCarrier {
    /// Queue-assigned message id, used only for logging
    pub message_id: String,

    /// Handle required to delete the message after a successful batch
    pub receipt_handle: String,

    /// Raw message body
    pub body: String,

    /// Decoded message, absent when decoding failed
    pub message: Option<ChangeMessage>,
}

impl MessageCarrier {
    /// Builds a carrier, attempting to decode the body
    pub fn new(message_id: String, receipt_handle: String, body: String) -> Self {
        let message = ChangeMessage::decode(&body);
        Self {
            message_id,
            receipt_handle,
            body,
            message,
        }
    }
}
