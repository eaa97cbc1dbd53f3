//! Persisted configuration entries.
//!
//! One entry per configured instance. Entries are created by the config flow
//! and read back by `platform::async_setup_entry`.

mod entry;
mod file_store;
mod store;

pub use entry::{ConfigEntry, EntryData};
pub use file_store::{default_entries_path, JsonFileEntryStore};
pub use store::{ConfigEntryStore, EntryStoreError, MemoryEntryStore};
