use reqwest::Url;

use super::{FlowError, UserInput};

/// Lowercased host of `base_url`, without IPv6 brackets.
pub fn hostname(base_url: &str) -> Result<String, FlowError> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| FlowError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    url.host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_lowercase())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| FlowError::InvalidUrl(format!("{}: no host", base_url)))
}

/// `<hostname>_<model>`, the identity used to deduplicate instances.
pub fn generate_unique_id(input: &UserInput) -> Result<String, FlowError> {
    let model = input.model().ok_or(FlowError::MissingModel)?;
    Ok(format!("{}_{}", hostname(input.base_url())?, model))
}
