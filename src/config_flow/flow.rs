use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::schema::{data_schema, DataSchema};
use super::state::{reduce, FlowEvent, FlowState, FormErrors};
use super::unique_id::{generate_unique_id, hostname};
use super::{
    FlowError, UserInput, ABORT_ALREADY_CONFIGURED, ABORT_FLOW_FINISHED, STEP_USER, UNKNOWN_ERROR,
};
use crate::config_entries::{ConfigEntry, ConfigEntryStore, EntryData, EntryStoreError};

/// What the host should do after a flow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    Form {
        step_id: String,
        data_schema: DataSchema,
        errors: FormErrors,
        /// Values entered so far, so the form can redisplay them
        #[serde(skip_serializing_if = "Option::is_none")]
        description_placeholders: Option<BTreeMap<String, String>>,
    },
    CreateEntry {
        title: String,
        data: EntryData,
    },
    Abort {
        reason: String,
    },
}

/// Ensure the model is present and not blank.
pub fn validate_user_input(input: &UserInput) -> Result<(), FlowError> {
    input.model().map(|_| ()).ok_or(FlowError::MissingModel)
}

/// Single-step setup flow for one new instance.
pub struct ConfigFlow {
    store: Arc<dyn ConfigEntryStore>,
    state: FlowState,
}

impl ConfigFlow {
    pub const VERSION: u32 = ConfigEntry::VERSION;

    pub fn new(store: Arc<dyn ConfigEntryStore>) -> Self {
        Self {
            store,
            state: FlowState::default(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Handle the `user` step: show the form, or validate a submission and
    /// create the entry.
    pub async fn async_step_user(&mut self, user_input: Option<UserInput>) -> FlowResult {
        match &self.state {
            FlowState::Aborted { reason } => {
                return FlowResult::Abort {
                    reason: reason.clone(),
                }
            }
            FlowState::Created { .. } => {
                return FlowResult::Abort {
                    reason: ABORT_FLOW_FINISHED.to_string(),
                }
            }
            FlowState::AwaitingInput { .. } => {}
        }

        let Some(input) = user_input else {
            self.state = reduce(&self.state, FlowEvent::Show);
            return self.show_form(None);
        };

        match self.try_create(&input).await {
            Ok((entry, result)) => {
                log::info!("Created config entry {}: {}", entry.entry_id, entry.title);
                self.state = reduce(
                    &self.state,
                    FlowEvent::Persisted {
                        entry_id: entry.entry_id,
                    },
                );
                result
            }
            Err(FlowError::Store(EntryStoreError::DuplicateUniqueId(unique_id))) => {
                log::info!("Instance {} is already configured", unique_id);
                self.state = reduce(&self.state, FlowEvent::Duplicate);
                FlowResult::Abort {
                    reason: ABORT_ALREADY_CONFIGURED.to_string(),
                }
            }
            Err(e) => {
                log::error!("Setup step failed: {}", e);
                let message = match &e {
                    FlowError::MissingModel | FlowError::InvalidUrl(_) => e.to_string(),
                    FlowError::Store(_) => UNKNOWN_ERROR.to_string(),
                };
                self.state = reduce(&self.state, FlowEvent::Rejected { message });
                self.show_form(Some(&input))
            }
        }
    }

    async fn try_create(
        &self,
        input: &UserInput,
    ) -> Result<(ConfigEntry, FlowResult), FlowError> {
        validate_user_input(input)?;
        let unique_id = generate_unique_id(input)?;

        if self
            .store
            .async_entry_for_unique_id(&unique_id)
            .await?
            .is_some()
        {
            return Err(FlowError::Store(EntryStoreError::DuplicateUniqueId(
                unique_id,
            )));
        }

        let host = hostname(input.base_url())?;
        let model = input.model().ok_or(FlowError::MissingModel)?;
        let title = format!("OpenAI Compatible STT ({}, {})", host, model);

        let data = EntryData {
            api_key: input.api_key().map(str::to_string),
            base_url: input.base_url().to_string(),
            model: model.to_string(),
            unique_id: Some(unique_id),
        };

        let entry = ConfigEntry::new(title.clone(), data.clone());
        // the store rejects duplicates too, covering concurrent flows
        self.store.async_add(entry.clone()).await?;

        Ok((entry, FlowResult::CreateEntry { title, data }))
    }

    fn show_form(&self, input: Option<&UserInput>) -> FlowResult {
        let errors = match &self.state {
            FlowState::AwaitingInput { errors } => errors.clone(),
            _ => FormErrors::new(),
        };

        FlowResult::Form {
            step_id: STEP_USER.to_string(),
            data_schema: data_schema(),
            errors,
            description_placeholders: input.map(UserInput::placeholders),
        }
    }
}
