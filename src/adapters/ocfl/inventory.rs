//! OCFL object inventory model
//!
//! The inventory is the per-object source of truth: the manifest maps
//! content digests to stored files, each version's state maps digests to
//! logical paths. Inventories are serialized as pretty-printed JSON with a
//! digest sidecar.

use crate::domain::errors::StorageError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

/// Inventory conformance type for OCFL 1.1
pub const INVENTORY_TYPE: &str = "https://ocfl.io/1.1/spec/#inventory";

/// The only digest algorithm this repository uses, matching upstream fixity
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Version content directory name
pub const CONTENT_DIRECTORY: &str = "content";

/// One version block inside an inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Creation timestamp, RFC 3339
    pub created: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Digest -> logical paths present in this version
    pub state: BTreeMap<String, Vec<String>>,
}

impl VersionEntry {
    /// Builds a version block from a logical-path -> digest view
    pub fn from_path_digests(created: DateTime<Utc>, paths: &HashMap<String, String>) -> Self {
        let mut state: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (path, digest) in paths {
            state.entry(digest.clone()).or_default().push(path.clone());
        }
        for paths in state.values_mut() {
            paths.sort();
        }
        Self {
            created: created.to_rfc3339_opts(SecondsFormat::Secs, true),
            message: None,
            state,
        }
    }

    /// Inverts the state into a logical-path -> digest map
    pub fn path_digests(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for (digest, paths) in &self.state {
            for path in paths {
                map.insert(path.clone(), digest.clone());
            }
        }
        map
    }
}

/// An OCFL object inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub id: String,

    #[serde(rename = "type")]
    pub spec_type: String,

    #[serde(rename = "digestAlgorithm")]
    pub digest_algorithm: String,

    pub head: String,

    #[serde(rename = "contentDirectory")]
    pub content_directory: String,

    /// Digest -> content paths relative to the object root
    pub manifest: BTreeMap<String, Vec<String>>,

    pub versions: BTreeMap<String, VersionEntry>,
}

impl Inventory {
    /// A fresh inventory for an object with no versions yet
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            spec_type: INVENTORY_TYPE.to_string(),
            digest_algorithm: DIGEST_ALGORITHM.to_string(),
            head: String::new(),
            content_directory: CONTENT_DIRECTORY.to_string(),
            manifest: BTreeMap::new(),
            versions: BTreeMap::new(),
        }
    }

    /// Parses an inventory, checking the digest algorithm contract
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let inventory: Inventory = serde_json::from_str(json)
            .map_err(|e| StorageError::Inventory(format!("parse failed: {e}")))?;
        if inventory.digest_algorithm != DIGEST_ALGORITHM {
            return Err(StorageError::Inventory(format!(
                "object {} uses digest algorithm '{}', expected '{DIGEST_ALGORITHM}'",
                inventory.id, inventory.digest_algorithm
            )));
        }
        Ok(inventory)
    }

    /// The HEAD version block, if any version exists
    pub fn head_version(&self) -> Option<&VersionEntry> {
        self.versions.get(&self.head)
    }

    /// Logical-path -> digest view of the HEAD version
    pub fn head_path_digests(&self) -> HashMap<String, String> {
        self.head_version()
            .map(VersionEntry::path_digests)
            .unwrap_or_default()
    }

    /// Name of the next version to be committed
    pub fn next_version_name(&self) -> Result<String, StorageError> {
        if self.head.is_empty() {
            return Ok("v1".to_string());
        }
        let number: u64 = self
            .head
            .strip_prefix('v')
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| {
                StorageError::Inventory(format!(
                    "object {} has malformed head version '{}'",
                    self.id, self.head
                ))
            })?;
        Ok(format!("v{}", number + 1))
    }

    /// Whether the manifest already stores content with this digest
    pub fn manifest_has(&self, digest: &str) -> bool {
        self.manifest.contains_key(digest)
    }

    /// Records newly stored content in the manifest
    pub fn add_manifest_entry(&mut self, digest: String, content_path: String) {
        self.manifest.entry(digest).or_default().push(content_path);
    }

    /// Appends a version and advances HEAD
    pub fn add_version(&mut self, name: String, entry: VersionEntry) {
        self.head = name.clone();
        self.versions.insert(name, entry);
    }

    /// Pretty-printed JSON rendering with a trailing newline
    pub fn to_pretty_json(&self) -> Result<String, StorageError> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::Inventory(format!("serialize failed: {e}")))?;
        json.push('\n');
        Ok(json)
    }

    /// Sidecar file line for a serialized inventory
    pub fn sidecar_line(inventory_json: &str) -> String {
        let digest = hex::encode(Sha256::digest(inventory_json.as_bytes()));
        format!("{digest}  inventory.json\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(paths: &[(&str, &str)]) -> VersionEntry {
        let map: HashMap<String, String> = paths
            .iter()
            .map(|(p, d)| (p.to_string(), d.to_string()))
            .collect();
        VersionEntry::from_path_digests(Utc::now(), &map)
    }

    #[test]
    fn test_new_inventory_first_version() {
        let inventory = Inventory::new("obj-1");
        assert_eq!(inventory.next_version_name().unwrap(), "v1");
        assert!(inventory.head_version().is_none());
        assert!(inventory.head_path_digests().is_empty());
    }

    #[test]
    fn test_version_progression() {
        let mut inventory = Inventory::new("obj-1");
        inventory.add_version("v1".to_string(), sample_entry(&[("a.xml", "d1")]));
        assert_eq!(inventory.head, "v1");
        assert_eq!(inventory.next_version_name().unwrap(), "v2");

        inventory.add_version("v2".to_string(), sample_entry(&[("a.xml", "d2")]));
        assert_eq!(inventory.head_path_digests().get("a.xml").unwrap(), "d2");
    }

    #[test]
    fn test_state_round_trip() {
        let entry = sample_entry(&[("a/b.tif", "d1"), ("a/c.tif", "d1"), ("x.xml", "d2")]);
        assert_eq!(entry.state.get("d1").unwrap().len(), 2);

        let paths = entry.path_digests();
        assert_eq!(paths.get("a/b.tif").unwrap(), "d1");
        assert_eq!(paths.get("x.xml").unwrap(), "d2");
    }

    #[test]
    fn test_json_round_trip() {
        let mut inventory = Inventory::new("obj-1");
        inventory.add_version("v1".to_string(), sample_entry(&[("a.xml", "d1")]));
        inventory.add_manifest_entry("d1".to_string(), "v1/content/a.xml".to_string());

        let json = inventory.to_pretty_json().unwrap();
        assert!(json.ends_with('\n'));
        assert!(json.contains("\"digestAlgorithm\": \"sha256\""));

        let parsed = Inventory::from_json(&json).unwrap();
        assert_eq!(parsed.head, "v1");
        assert!(parsed.manifest_has("d1"));
    }

    #[test]
    fn test_wrong_digest_algorithm_rejected() {
        let json = r#"{
            "id": "obj-1",
            "type": "https://ocfl.io/1.1/spec/#inventory",
            "digestAlgorithm": "sha512",
            "head": "v1",
            "contentDirectory": "content",
            "manifest": {},
            "versions": {}
        }"#;
        assert!(Inventory::from_json(json).is_err());
    }

    #[test]
    fn test_sidecar_line_format() {
        let line = Inventory::sidecar_line("{}\n");
        assert!(line.ends_with("  inventory.json\n"));
        assert_eq!(line.split_whitespace().next().unwrap().len(), 64);
    }
}
