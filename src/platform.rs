//! STT platform setup
//!
//! The host calls `async_setup_entry` once per persisted config entry at
//! startup; it builds the HTTP client for the entry and registers one
//! entity through the host's `AddEntities` callback.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config_entries::{ConfigEntry, ConfigEntryStore, EntryStoreError};
use crate::consts::ENTITY_ID_FORMAT;
use crate::entity::OpenAiCompatibleSttEntity;
use crate::stt::SpeechToTextEntity;
use crate::transcription::{OpenAiClient, TranscriptionError};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to create transcription client for {entry}: {source}")]
    Client {
        entry: String,
        #[source]
        source: TranscriptionError,
    },
    #[error(transparent)]
    Store(#[from] EntryStoreError),
}

/// The host's entity registration callback.
pub trait AddEntities {
    /// Entity ids already taken on the host.
    fn existing_entity_ids(&self) -> Vec<String>;

    fn add_entities(&mut self, entities: Vec<Arc<dyn SpeechToTextEntity>>);
}

/// Lowercase ASCII slug: every run of non-alphanumerics becomes one `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}

/// Fill `format`'s `{}` with the slug of `name`, appending `_2`, `_3`, ...
/// until the id is not in `existing`.
pub fn generate_entity_id(format: &str, name: &str, existing: &[String]) -> String {
    let preferred = format.replace("{}", &slugify(name));
    if !existing.contains(&preferred) {
        return preferred;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", preferred, n);
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Set up the STT entity for one config entry.
///
/// `http` is the host's shared reqwest client; every entity clones it so
/// connections are pooled across instances.
pub async fn async_setup_entry(
    entry: &ConfigEntry,
    http: &reqwest::Client,
    add_entities: &mut dyn AddEntities,
) -> Result<(), SetupError> {
    let client = OpenAiClient::with_http_client(
        http.clone(),
        &entry.data.base_url,
        entry.data.api_key.clone(),
    )
    .map_err(|source| SetupError::Client {
        entry: entry.title.clone(),
        source,
    })?;

    let entity_id = generate_entity_id(
        ENTITY_ID_FORMAT,
        &entry.data.model,
        &add_entities.existing_entity_ids(),
    );

    log::info!(
        "Setting up {} as {} (endpoint {}, api key {})",
        entry.title,
        entity_id,
        client.endpoint(),
        if client.has_api_key() { "set" } else { "not set" }
    );

    let entity: Arc<dyn SpeechToTextEntity> =
        Arc::new(OpenAiCompatibleSttEntity::new(entry, Arc::new(client)).with_entity_id(entity_id));
    add_entities.add_entities(vec![entity]);
    Ok(())
}

/// Set up every entry in `store`. Entries that fail are logged and skipped.
/// Returns the number of entries set up.
pub async fn async_setup_entries(
    store: &dyn ConfigEntryStore,
    http: &reqwest::Client,
    add_entities: &mut dyn AddEntities,
) -> Result<usize, SetupError> {
    let mut count = 0;
    for entry in store.async_entries().await? {
        match async_setup_entry(&entry, http, add_entities).await {
            Ok(()) => count += 1,
            Err(e) => log::error!("Skipping entry {}: {}", entry.entry_id, e),
        }
    }
    Ok(count)
}

/// Minimal `AddEntities` implementation keyed by entity id.
#[derive(Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, Arc<dyn SpeechToTextEntity>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_id: &str) -> Option<Arc<dyn SpeechToTextEntity>> {
        self.entities.get(entity_id).cloned()
    }

    pub fn entity_ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl AddEntities for EntityRegistry {
    fn existing_entity_ids(&self) -> Vec<String> {
        self.entity_ids()
    }

    fn add_entities(&mut self, entities: Vec<Arc<dyn SpeechToTextEntity>>) {
        for entity in entities {
            let existing = self.entity_ids();
            let entity_id = entity
                .entity_id()
                .filter(|id| !existing.contains(id))
                .unwrap_or_else(|| generate_entity_id("stt.{}", &entity.name(), &existing));
            log::debug!("Registered entity {}", entity_id);
            self.entities.insert(entity_id, entity);
        }
    }
}
