//! Setup wizard (config flow) for OpenAI Compatible STT
//!
//! Collects the API key, base URL and model, derives the instance's unique
//! id from `<hostname>_<model>`, refuses duplicates and persists a new
//! config entry.

mod flow;
mod schema;
mod state;
mod unique_id;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config_entries::EntryStoreError;
use crate::consts::{CONF_API_KEY, CONF_MODEL, CONF_URL, DEFAULT_URL};

pub use flow::{validate_user_input, ConfigFlow, FlowResult};
pub use schema::{data_schema, DataSchema, SchemaField, SelectMode, Selector};
pub use state::{reduce, FlowEvent, FlowState, FormErrors, BASE_ERROR_KEY};
pub use unique_id::{generate_unique_id, hostname};

pub const STEP_USER: &str = "user";
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";
pub const ABORT_FLOW_FINISHED: &str = "flow_finished";
pub const UNKNOWN_ERROR: &str = "unknown_error";

/// Values submitted on the `user` step form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl UserInput {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: Some(base_url.into()),
            model: Some(model.into()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Trimmed model, `None` when missing or blank.
    pub fn model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Base URL, falling back to the form default when left out.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_URL)
    }

    /// API key, `None` when missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Entered values keyed by field, for redisplaying the form.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        [
            (CONF_API_KEY, &self.api_key),
            (CONF_URL, &self.base_url),
            (CONF_MODEL, &self.model),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}

/// Errors raised while validating a submission.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Model is required")]
    MissingModel,
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Store(#[from] EntryStoreError),
}
