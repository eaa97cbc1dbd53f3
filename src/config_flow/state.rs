//! Setup flow state machine
//!
//! All transitions go through `reduce()`. Terminal states (`Created`,
//! `Aborted`) ignore every further event.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Field key -> error message. `"base"` holds form-wide errors.
pub type FormErrors = BTreeMap<String, String>;

pub const BASE_ERROR_KEY: &str = "base";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    AwaitingInput { errors: FormErrors },
    Created { entry_id: Uuid },
    Aborted { reason: String },
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::AwaitingInput {
            errors: FormErrors::new(),
        }
    }
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlowState::AwaitingInput { .. })
    }
}

/// Outcome of handling one submission.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// Form requested without input
    Show,
    /// Input rejected; shown on the form under `BASE_ERROR_KEY`
    Rejected { message: String },
    /// An instance with the same unique id exists
    Duplicate,
    /// Entry persisted
    Persisted { entry_id: Uuid },
}

/// Reducer function: (state, event) -> next_state
pub fn reduce(state: &FlowState, event: FlowEvent) -> FlowState {
    use FlowEvent::*;
    use FlowState::*;

    match (state, event) {
        // -----------------
        // Terminal states
        // -----------------
        (Created { .. } | Aborted { .. }, _) => state.clone(),

        // -----------------
        // AwaitingInput
        // -----------------
        (AwaitingInput { .. }, Show) => AwaitingInput {
            errors: FormErrors::new(),
        },
        (AwaitingInput { .. }, Rejected { message }) => {
            let mut errors = FormErrors::new();
            errors.insert(BASE_ERROR_KEY.to_string(), message);
            AwaitingInput { errors }
        }
        (AwaitingInput { .. }, Duplicate) => Aborted {
            reason: super::ABORT_ALREADY_CONFIGURED.to_string(),
        },
        (AwaitingInput { .. }, Persisted { entry_id }) => Created { entry_id },
    }
}
