//! Config entries persisted as a JSON document.
//!
//! Default location: ~/.config/openai-compatible-stt/config_entries.json

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{ensure_unique, ConfigEntryStore, EntryStoreError};
use super::ConfigEntry;

const APP_DIR_NAME: &str = "openai-compatible-stt";
const ENTRIES_FILE_NAME: &str = "config_entries.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct EntriesDocument {
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

/// Default path of the entries file in the user's config directory.
pub fn default_entries_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(ENTRIES_FILE_NAME)
}

/// A `ConfigEntryStore` backed by one JSON file.
///
/// A missing file is an empty store. Writes go to a sibling temp file that
/// is then renamed over the original so a crash never leaves a truncated
/// document behind.
#[derive(Debug)]
pub struct JsonFileEntryStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `default_entries_path()`.
    pub fn open_default() -> Self {
        Self::new(default_entries_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<EntriesDocument, EntryStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| EntryStoreError::Read {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EntriesDocument::default()),
            Err(e) => Err(EntryStoreError::Read {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn save(&self, document: &EntriesDocument) -> Result<(), EntryStoreError> {
        let write_err = |message: String| EntryStoreError::Write {
            path: self.path.display().to_string(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(format!("create directory {:?}: {}", parent, e)))?;
        }

        let contents = serde_json::to_string_pretty(document)
            .map_err(|e| write_err(format!("serialize entries: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &contents)
            .await
            .map_err(|e| write_err(format!("write temp file {:?}: {}", tmp_path, e)))?;

        // Windows refuses to rename over an existing file
        if cfg!(windows) {
            if let Err(e) = tokio::fs::remove_file(&self.path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(write_err(format!("remove existing file: {}", e)));
                }
            }
        }

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| write_err(format!("rename {:?}: {}", tmp_path, e)))
    }
}

#[async_trait]
impl ConfigEntryStore for JsonFileEntryStore {
    async fn async_entries(&self) -> Result<Vec<ConfigEntry>, EntryStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.entries)
    }

    async fn async_add(&self, entry: ConfigEntry) -> Result<(), EntryStoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        ensure_unique(&document.entries, &entry)?;

        log::debug!("Persisting config entry {} to {:?}", entry.entry_id, self.path);
        document.entries.push(entry);
        self.save(&document).await
    }

    async fn async_remove(&self, entry_id: Uuid) -> Result<Option<ConfigEntry>, EntryStoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let Some(idx) = document.entries.iter().position(|e| e.entry_id == entry_id) else {
            return Ok(None);
        };
        let removed = document.entries.remove(idx);
        self.save(&document).await?;
        Ok(Some(removed))
    }
}
