use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_URL, DOMAIN};

/// Connection settings for one configured instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub model: String,
    /// Absent in entries written before unique ids were introduced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_URL.to_string()
}

/// A persisted, immutable configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: Uuid,
    pub domain: String,
    pub version: u32,
    pub title: String,
    pub unique_id: Option<String>,
    pub data: EntryData,
    pub created_at: DateTime<Utc>,
}

impl ConfigEntry {
    pub const VERSION: u32 = 1;

    pub fn new(title: impl Into<String>, data: EntryData) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            domain: DOMAIN.to_string(),
            version: Self::VERSION,
            title: title.into(),
            unique_id: data.unique_id.clone(),
            data,
            created_at: Utc::now(),
        }
    }
}
