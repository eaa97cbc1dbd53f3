//! Declarative description of the setup form, rendered by the host.

use serde::Serialize;

use crate::consts::{CONF_API_KEY, CONF_MODEL, CONF_URL, DEFAULT_MODEL, DEFAULT_URL, MODELS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    Dropdown,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selector {
    Text,
    Select {
        options: Vec<String>,
        mode: SelectMode,
        /// Host sorts options before display
        sort: bool,
        /// Values outside `options` are accepted
        custom_value: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub key: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub selector: Selector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSchema {
    pub fields: Vec<SchemaField>,
}

impl DataSchema {
    pub fn field(&self, key: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// The `user` step form: optional API key, base URL and a model chosen from
/// the suggestions or typed in.
pub fn data_schema() -> DataSchema {
    DataSchema {
        fields: vec![
            SchemaField {
                key: CONF_API_KEY,
                required: false,
                default: None,
                selector: Selector::Text,
            },
            SchemaField {
                key: CONF_URL,
                required: false,
                default: Some(DEFAULT_URL.to_string()),
                selector: Selector::Text,
            },
            SchemaField {
                key: CONF_MODEL,
                required: true,
                default: Some(DEFAULT_MODEL.to_string()),
                selector: Selector::Select {
                    options: MODELS.iter().map(|m| m.to_string()).collect(),
                    mode: SelectMode::Dropdown,
                    sort: true,
                    custom_value: true,
                },
            },
        ],
    }
}
