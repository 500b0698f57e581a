//! File-backed durable storage, one TOML file per origin.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::DurableStoragePort;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "plannerx";
const APP_NAME: &str = "plannerx";
const STORAGE_DIR: &str = "storage";

/// Durable storage persisted as a flat TOML table.
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the storage file for `origin` under the platform data directory.
    ///
    /// # Errors
    /// Returns error if the data directory cannot be determined or the file
    /// cannot be read.
    pub fn open(origin: &str) -> Result<Self, StorageError> {
        let dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join(STORAGE_DIR))
            .ok_or_else(|| StorageError::not_available("failed to determine data directory"))?;

        Self::open_in(&dir, origin)
    }

    /// Opens the storage file for `origin` inside `dir`.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn open_in(dir: &Path, origin: &str) -> Result<Self, StorageError> {
        let path = dir.join(format!("{}.toml", file_stem(origin)));
        let items = Self::load(&path)?;
        debug!(path = %path.display(), entries = items.len(), "Opened file storage");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StorageError::access(format!("failed to read {}: {e}", path.display())))?;

        match toml::from_str(&content) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed storage file, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, items: &BTreeMap<String, String>, key: &str) -> Result<(), StorageError> {
        let content = toml::to_string(items).map_err(|e| StorageError::write(key, e.to_string()))?;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| StorageError::write(key, "invalid storage path"))?;
        fs::create_dir_all(parent).map_err(|e| StorageError::write(key, e.to_string()))?;

        let mut temp_file =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| StorageError::write(key, e.to_string()))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| StorageError::write(key, e.to_string()))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StorageError::write(key, e.error.to_string()))?;

        Ok(())
    }
}

impl DurableStoragePort for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock();
        items.insert(key.to_string(), value.to_string());
        self.save(&items, key)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock();
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.save(&items, key)
            .map_err(|e| StorageError::remove(key, e.to_string()))
    }
}

fn file_stem(origin: &str) -> String {
    origin
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
