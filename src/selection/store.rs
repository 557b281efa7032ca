//! Key-value blob storage for mirroring state between runs
//!
//! Values are JSON strings stored under short human-readable keys.

use super::SelectionSet;
use crate::error::{StoreError, StoreResult};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key the selection set is stored under unless told otherwise
pub const SELECTION_KEY: &str = "selected_products";

/// Minimal get/put/remove blob storage
pub trait BlobStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// Keys are limited to `[A-Za-z0-9_.-]` so they map safely onto file names
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey { key: key.to_string() })
    }
}

/// In-process store, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.blobs.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// The directory is created on first write
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write then rename so readers never see a partial blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SelectionSet {
    /// Mirror the set into `store` as a JSON array
    pub fn save_to<S: BlobStore + ?Sized>(&self, store: &mut S, key: &str) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        store.put(key, &json)?;
        info!("Saved {} selected products under '{}'", self.len(), key);
        Ok(())
    }

    /// Restore a set from `store`; an absent key yields an empty set
    pub fn load_from<S: BlobStore + ?Sized>(store: &S, key: &str) -> StoreResult<Self> {
        match store.get(key)? {
            Some(json) => {
                let set: SelectionSet = serde_json::from_str(&json)?;
                debug!("Restored {} selected products from '{}'", set.len(), key);
                Ok(set)
            }
            None => Ok(SelectionSet::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductDescriptor, ProductKind};
    use tempfile::tempdir;

    fn sample_set() -> SelectionSet {
        let mut set = SelectionSet::new();
        set.add(
            ProductDescriptor::new("S1", ProductKind::Saving)
                .with_term("12")
                .with_rate(4.5),
        );
        set.add(ProductDescriptor::new("D1", ProductKind::Deposit));
        set
    }

    #[test]
    fn test_key_validation() {
        assert!(validate_key("selected_products").is_ok());
        assert!(validate_key("v2.selection-backup").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryBlobStore::new();
        let set = sample_set();
        set.save_to(&mut store, SELECTION_KEY).unwrap();

        let restored = SelectionSet::load_from(&store, SELECTION_KEY).unwrap();
        assert_eq!(restored, set);
        assert_eq!(restored.selected_savings().len(), 1);
    }

    #[test]
    fn test_absent_key_loads_empty() {
        let store = MemoryBlobStore::new();
        let set = SelectionSet::load_from(&store, SELECTION_KEY).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let state_dir = dir.path().join("state");

        let mut store = FileBlobStore::new(&state_dir);
        sample_set().save_to(&mut store, SELECTION_KEY).unwrap();
        assert!(state_dir.join("selected_products.json").exists());

        let reopened = FileBlobStore::new(&state_dir);
        let restored = SelectionSet::load_from(&reopened, SELECTION_KEY).unwrap();
        assert_eq!(restored, sample_set());
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileBlobStore::new(dir.path());
        store.put("scratch", "{}").unwrap();
        assert_eq!(store.get("scratch").unwrap().as_deref(), Some("{}"));

        store.remove("scratch").unwrap();
        assert!(store.get("scratch").unwrap().is_none());
        store.remove("scratch").unwrap();
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let mut store = MemoryBlobStore::new();
        store.put(SELECTION_KEY, "not json").unwrap();
        let err = SelectionSet::load_from(&store, SELECTION_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
