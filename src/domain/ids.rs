//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers flowing through the pipeline. Each
//! type validates on construction so downstream code can rely on the format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reference to a logical archival entity (information or content object)
///
/// Entity references are UUIDs throughout the upstream API and are also used
/// verbatim as OCFL object identifiers.
///
/// # Examples
///
/// ```
/// use arca::domain::ids::EntityRef;
/// use std::str::FromStr;
///
/// let entity_ref = EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(entity_ref.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(Uuid);

impl EntityRef {
    /// Creates a new EntityRef from a UUID
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parses an EntityRef from its canonical string rendering
    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid entity reference '{s}': {e}"))
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for EntityRef {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// SourceID newtype wrapper
///
/// The external business identifier attached to an information object,
/// mandatory in its metadata. Used as the published identifier for IO
/// metadata change events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Creates a new SourceId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or whitespace-only
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("SourceID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the SourceID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_parse() {
        let entity_ref = EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
        assert_eq!(
            entity_ref.to_string(),
            "7d44b88c-4199-4bad-97dc-d78268e01398"
        );
    }

    #[test]
    fn test_entity_ref_invalid() {
        assert!(EntityRef::parse("not-a-uuid").is_err());
        assert!(EntityRef::parse("").is_err());
    }

    #[test]
    fn test_entity_ref_serde_transparent() {
        let entity_ref = EntityRef::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
        let json = serde_json::to_string(&entity_ref).unwrap();
        assert_eq!(json, "\"7d44b88c-4199-4bad-97dc-d78268e01398\"");

        let back: EntityRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity_ref);
    }

    #[test]
    fn test_source_id_creation() {
        let id = SourceId::new("SRC-1").unwrap();
        assert_eq!(id.as_str(), "SRC-1");
        assert_eq!(format!("{id}"), "SRC-1");
    }

    #[test]
    fn test_source_id_empty_fails() {
        assert!(SourceId::new("").is_err());
        assert!(SourceId::new("   ").is_err());
    }
}
