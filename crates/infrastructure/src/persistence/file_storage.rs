//! File-backed key-value storage.
//!
//! All keys live in one JSON object in the platform config directory:
//! - Linux: ~/.config/adex/storage.json
//! - macOS: ~/Library/Application Support/adex/storage.json
//! - Windows: %APPDATA%/adex/storage.json

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use adex_application::ports::{KeyValueStorage, StorageError};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

/// [`KeyValueStorage`] persisted to a single JSON file.
///
/// The file is read once on first access and rewritten after every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<Option<Entries>>,
}

impl FileStorage {
    /// Creates a storage at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Creates a storage at [`Self::default_location`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoLocation`] if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, StorageError> {
        Self::default_location()
            .map(Self::new)
            .ok_or(StorageError::NoLocation)
    }

    /// Returns the platform storage path, if available.
    #[must_use]
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("adex").join("storage.json"))
    }

    /// Returns the storage file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<Entries, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => from_json_bytes(&bytes).or_else(|error| {
                tracing::warn!(path = %self.path.display(), %error, "ignoring corrupt storage file");
                Ok(Entries::new())
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(error) => Err(error.into()),
        }
    }

    async fn write_file(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let content = to_json_stable_bytes(entries).map_err(storage_error)?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    /// Applies `change` to the cached entries and writes them out.
    async fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) -> bool + Send,
    {
        let mut cache = self.cache.lock().await;
        let mut entries = match cache.take() {
            Some(entries) => entries,
            None => self.read_file().await?,
        };

        let changed = change(&mut entries);
        let written = if changed {
            self.write_file(&entries).await
        } else {
            Ok(())
        };
        *cache = Some(entries);
        written
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        Ok(cache.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some()).await
    }
}

fn storage_error(error: SerializationError) -> StorageError {
    StorageError::Serialization(error.to_string())
}
