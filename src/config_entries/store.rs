use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ConfigEntry;

#[derive(Debug, thiserror::Error)]
pub enum EntryStoreError {
    #[error("an entry with unique id {0:?} already exists")]
    DuplicateUniqueId(String),
    #[error("failed to read entries from {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to write entries to {path}: {message}")]
    Write { path: String, message: String },
}

/// The host's configuration store.
#[async_trait]
pub trait ConfigEntryStore: Send + Sync {
    async fn async_entries(&self) -> Result<Vec<ConfigEntry>, EntryStoreError>;

    async fn async_entry_for_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Option<ConfigEntry>, EntryStoreError> {
        Ok(self
            .async_entries()
            .await?
            .into_iter()
            .find(|e| e.unique_id.as_deref() == Some(unique_id)))
    }

    /// Persist `entry`. Refuses a second entry with the same unique id.
    async fn async_add(&self, entry: ConfigEntry) -> Result<(), EntryStoreError>;

    /// Remove an entry, returning it if it existed.
    async fn async_remove(&self, entry_id: Uuid) -> Result<Option<ConfigEntry>, EntryStoreError>;
}

pub(super) fn ensure_unique(
    entries: &[ConfigEntry],
    entry: &ConfigEntry,
) -> Result<(), EntryStoreError> {
    if let Some(unique_id) = &entry.unique_id {
        if entries
            .iter()
            .any(|e| e.unique_id.as_ref() == Some(unique_id))
        {
            return Err(EntryStoreError::DuplicateUniqueId(unique_id.clone()));
        }
    }
    Ok(())
}

/// Entries held in memory only.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<Vec<ConfigEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ConfigEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl ConfigEntryStore for MemoryEntryStore {
    async fn async_entries(&self) -> Result<Vec<ConfigEntry>, EntryStoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn async_add(&self, entry: ConfigEntry) -> Result<(), EntryStoreError> {
        let mut entries = self.entries.lock().await;
        ensure_unique(&entries, &entry)?;
        entries.push(entry);
        Ok(())
    }

    async fn async_remove(&self, entry_id: Uuid) -> Result<Option<ConfigEntry>, EntryStoreError> {
        let mut entries = self.entries.lock().await;
        let Some(idx) = entries.iter().position(|e| e.entry_id == entry_id) else {
            return Ok(None);
        };
        Ok(Some(entries.remove(idx)))
    }
}
