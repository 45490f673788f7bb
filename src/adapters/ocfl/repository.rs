//! Filesystem OCFL repository
//!
//! Binds to the storage root at startup, classifies candidate DR objects
//! against HEAD inventories, and commits staged writes as new versions.
//! Versions are assembled in the work directory and renamed into place, so
//! a failed commit never exposes a partial version: the old HEAD stays the
//! live view until the root inventory is switched.

use crate::adapters::ocfl::inventory::{Inventory, VersionEntry, CONTENT_DIRECTORY};
use crate::adapters::ocfl::layout::{
    HashedNTupleLayout, LAYOUT_DESCRIPTOR, OBJECT_NAMASTE, OBJECT_NAMASTE_CONTENT,
    REPOSITORY_NAMASTE, REPOSITORY_NAMASTE_CONTENT,
};
use crate::config::OcflConfig;
use crate::domain::dr_object::{DrObject, StagedWrite};
use crate::domain::errors::StorageError;
use crate::domain::ids::EntityRef;
use crate::domain::Result;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of classifying a candidate set against the repository
#[derive(Debug, Default)]
pub struct Classification {
    /// Candidates with no stored counterpart
    pub missing: Vec<DrObject>,

    /// Candidates whose stored digest differs
    pub changed: Vec<DrObject>,

    /// Count of candidates already stored with a matching digest
    pub unchanged: usize,
}

/// Handle to the local OCFL repository
///
/// Opened once at startup and shared for the process lifetime. Commits are
/// serialized per object id so concurrent staging work can never open two
/// versions of the same object.
pub struct OcflRepository {
    root: PathBuf,
    work: PathBuf,
    layout: HashedNTupleLayout,
    commit_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OcflRepository {
    /// Bind to (and if necessary bootstrap) the repository root
    pub fn open(config: &OcflConfig) -> Result<Self> {
        let root = PathBuf::from(&config.repo_dir);
        let work = PathBuf::from(&config.work_dir);

        fs::create_dir_all(&root)
            .map_err(|e| StorageError::InvalidRoot(format!("{}: {e}", root.display())))?;
        fs::create_dir_all(&work)
            .map_err(|e| StorageError::InvalidRoot(format!("{}: {e}", work.display())))?;

        let namaste = root.join(REPOSITORY_NAMASTE);
        if !namaste.exists() {
            let is_empty = fs::read_dir(&root)
                .map_err(|e| StorageError::InvalidRoot(e.to_string()))?
                .next()
                .is_none();
            if !is_empty {
                return Err(StorageError::InvalidRoot(format!(
                    "{} is non-empty but carries no {REPOSITORY_NAMASTE} declaration",
                    root.display()
                ))
                .into());
            }
            fs::write(&namaste, REPOSITORY_NAMASTE_CONTENT)
                .map_err(|e| StorageError::InvalidRoot(e.to_string()))?;
            fs::write(root.join("ocfl_layout.json"), LAYOUT_DESCRIPTOR)
                .map_err(|e| StorageError::InvalidRoot(e.to_string()))?;
            tracing::info!(root = %root.display(), "Initialized OCFL storage root");
        }

        Ok(Self {
            root,
            work,
            layout: HashedNTupleLayout::default(),
            commit_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Absolute path of an object root, whether or not it exists
    fn object_root_path(&self, object_id: &str) -> PathBuf {
        self.root.join(self.layout.object_root(object_id))
    }

    fn load_inventory_at(object_root: &Path) -> Result<Option<Inventory>> {
        let inventory_path = object_root.join("inventory.json");
        if !inventory_path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&inventory_path)
            .map_err(|e| StorageError::Inventory(format!("{}: {e}", inventory_path.display())))?;
        Ok(Some(Inventory::from_json(&json)?))
    }

    /// Classify candidates into missing and changed against HEAD state
    ///
    /// Candidates whose destination path holds content with the expected
    /// digest are unchanged and only counted.
    pub fn classify(&self, candidates: Vec<DrObject>) -> Result<Classification> {
        let mut result = Classification::default();

        let mut groups: BTreeMap<EntityRef, Vec<DrObject>> = BTreeMap::new();
        for candidate in candidates {
            groups.entry(candidate.io_ref()).or_default().push(candidate);
        }

        for (io_ref, group) in groups {
            let object_root = self.object_root_path(&io_ref.to_string());
            match Self::load_inventory_at(&object_root)? {
                None => {
                    tracing::debug!(io_ref = %io_ref, count = group.len(), "Object absent, all candidates missing");
                    result.missing.extend(group);
                }
                Some(inventory) => {
                    let stored = inventory.head_path_digests();
                    for candidate in group {
                        match stored.get(candidate.destination_path()) {
                            None => result.missing.push(candidate),
                            Some(digest)
                                if digest.eq_ignore_ascii_case(candidate.expected_digest()) =>
                            {
                                result.unchanged += 1;
                            }
                            Some(_) => result.changed.push(candidate),
                        }
                    }
                }
            }
        }

        tracing::info!(
            missing = result.missing.len(),
            changed = result.changed.len(),
            unchanged = result.unchanged,
            "Classified candidate set"
        );

        Ok(result)
    }

    async fn object_lock(&self, object_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.commit_locks.lock().await;
        locks
            .entry(object_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Commit staged writes as one new version of the object
    ///
    /// Creates the object if it does not exist. Content already present in
    /// the manifest is referenced, not copied, so replays and unchanged
    /// payloads cost no storage.
    pub async fn commit(&self, io_ref: &EntityRef, staged: &[StagedWrite]) -> Result<()> {
        if staged.is_empty() {
            return Ok(());
        }

        let object_id = io_ref.to_string();
        let lock = self.object_lock(&object_id).await;
        let _guard = lock.lock().await;

        let object_root = self.object_root_path(&object_id);
        let existing = Self::load_inventory_at(&object_root)?;
        let is_new = existing.is_none();
        let mut inventory = existing.unwrap_or_else(|| Inventory::new(&object_id));
        let version_name = inventory.next_version_name()?;

        let assembly = tempfile::Builder::new()
            .prefix("arca-commit-")
            .tempdir_in(&self.work)
            .map_err(|e| StorageError::Commit(format!("work dir: {e}")))?;

        let assembled_root = if is_new {
            assembly.path().join("object")
        } else {
            assembly.path().to_path_buf()
        };
        let version_dir = assembled_root.join(&version_name);
        let content_dir = version_dir.join(CONTENT_DIRECTORY);

        let mut path_digests = inventory.head_path_digests();

        for write in staged {
            let digest = sha256_file(&write.staging_path).map_err(|e| {
                StorageError::Commit(format!("{}: {e}", write.staging_path.display()))
            })?;

            if !inventory.manifest_has(&digest) {
                let target = content_dir.join(&write.destination_path);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| StorageError::Write(e.to_string()))?;
                }
                fs::copy(&write.staging_path, &target)
                    .map_err(|e| StorageError::Write(e.to_string()))?;
                inventory.add_manifest_entry(
                    digest.clone(),
                    format!("{version_name}/{CONTENT_DIRECTORY}/{}", write.destination_path),
                );
            }

            path_digests.insert(write.destination_path.clone(), digest);
        }

        let entry = VersionEntry::from_path_digests(Utc::now(), &path_digests);
        inventory.add_version(version_name.clone(), entry);

        let inventory_json = inventory.to_pretty_json()?;
        let sidecar = Inventory::sidecar_line(&inventory_json);

        fs::create_dir_all(&version_dir).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::write(version_dir.join("inventory.json"), &inventory_json)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        fs::write(version_dir.join("inventory.json.sha256"), &sidecar)
            .map_err(|e| StorageError::Write(e.to_string()))?;

        if is_new {
            fs::write(assembled_root.join(OBJECT_NAMASTE), OBJECT_NAMASTE_CONTENT)
                .map_err(|e| StorageError::Write(e.to_string()))?;
            fs::write(assembled_root.join("inventory.json"), &inventory_json)
                .map_err(|e| StorageError::Write(e.to_string()))?;
            fs::write(assembled_root.join("inventory.json.sha256"), &sidecar)
                .map_err(|e| StorageError::Write(e.to_string()))?;

            if let Some(parent) = object_root.parent() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Commit(e.to_string()))?;
            }
            fs::rename(&assembled_root, &object_root)
                .map_err(|e| StorageError::Commit(format!("object move: {e}")))?;
        } else {
            let target_version = object_root.join(&version_name);
            if target_version.exists() {
                return Err(StorageError::Commit(format!(
                    "version {version_name} of object {object_id} already exists"
                ))
                .into());
            }
            fs::rename(&version_dir, &target_version)
                .map_err(|e| StorageError::Commit(format!("version move: {e}")))?;

            // The root inventory switch is the commit point
            let pending_inventory = object_root.join("inventory.json.commit");
            let pending_sidecar = object_root.join("inventory.json.sha256.commit");
            fs::write(&pending_inventory, &inventory_json)
                .map_err(|e| StorageError::Commit(e.to_string()))?;
            fs::write(&pending_sidecar, &sidecar)
                .map_err(|e| StorageError::Commit(e.to_string()))?;
            fs::rename(&pending_inventory, object_root.join("inventory.json"))
                .map_err(|e| StorageError::Commit(e.to_string()))?;
            fs::rename(&pending_sidecar, object_root.join("inventory.json.sha256"))
                .map_err(|e| StorageError::Commit(e.to_string()))?;
        }

        tracing::info!(
            io_ref = %io_ref,
            version = %version_name,
            files = staged.len(),
            "Committed OCFL version"
        );

        Ok(())
    }
}

/// Streaming SHA-256 of a file's bytes
fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
