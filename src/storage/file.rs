use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use super::{KeyValueStore, StoreError};

/// One JSON object on disk, re-read on every call. Writes go through a
/// temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota_bytes: Option<u64>,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota_bytes: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>, key: &str) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(map)?;
        if let Some(limit) = self.quota_bytes {
            let size = encoded.len() as u64;
            if size > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    // A corrupt file is replaced on the next write.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_map() {
            Err(StoreError::Serialization(err)) => {
                tracing::warn!(
                    target: "storage",
                    path = %self.path.display(),
                    error = %err,
                    "storage file is corrupt; starting from an empty map"
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load_for_write()?;
        map.insert(key.to_string(), value);
        self.write_map(&map, key)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load_for_write()?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map, key)
    }
}
