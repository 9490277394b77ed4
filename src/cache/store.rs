// Persisted stores for the stats cache entry.
// FileStore writes JSON atomically; MemoryStore keeps the entry for the process lifetime.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Serialize, de::DeserializeOwned};

use crate::config::RepoId;
use crate::error::{Result, StarboardError};
use crate::stats::{CacheEntry, EntryStore};

use super::paths;

/// Read JSON data from a file. A missing file is `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&contents)?;
    Ok(Some(data))
}

/// Write data as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Stats entry persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store for `repo` under the configured or platform cache directory.
    pub fn for_repo(cache_dir: Option<&Path>, repo: &RepoId) -> Result<Self> {
        let base = paths::resolve_cache_dir(cache_dir).ok_or_else(|| {
            StarboardError::StorageUnavailable("no cache directory available".to_string())
        })?;
        Ok(Self::new(paths::stats_path(&base, repo)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryStore for FileStore {
    fn read(&self) -> Result<Option<CacheEntry>> {
        read_json(&self.path)
    }

    fn write(&self, entry: &CacheEntry) -> Result<()> {
        write_json(&self.path, entry)
    }
}

/// Process-local store, used when no cache directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entry: Mutex<Option<CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(entry: CacheEntry) -> Self {
        Self {
            entry: Mutex::new(Some(entry)),
        }
    }
}

impl EntryStore for MemoryStore {
    fn read(&self) -> Result<Option<CacheEntry>> {
        self.entry
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StarboardError::StorageUnavailable("memory store poisoned".to_string()))
    }

    fn write(&self, entry: &CacheEntry) -> Result<()> {
        let mut guard = self
            .entry
            .lock()
            .map_err(|_| StarboardError::StorageUnavailable("memory store poisoned".to_string()))?;
        *guard = Some(entry.clone());
        Ok(())
    }
}
