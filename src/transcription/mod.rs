//! Transcription module for OpenAI Compatible STT
//!
//! `TranscriptionClient` is the seam between the entity and the remote API;
//! `OpenAiClient` is the reqwest implementation used in production.

mod openai;

use async_trait::async_trait;

pub use openai::{transcriptions_endpoint, OpenAiClient};

/// One audio submission.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub model: String,
    /// ISO 639-1 hint; `None` lets the server detect the language.
    pub language: Option<String>,
    /// Complete WAV file
    pub audio: Vec<u8>,
    pub file_name: String,
}

/// Text returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
}

/// Errors that can occur during transcription
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Could not build the request (bad URL, bad MIME type)
    #[error("Invalid transcription request: {0}")]
    InvalidRequest(String),
    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),
    /// The API returned an error status
    #[error("Transcription API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// A remote speech-to-text service. Must be usable from many concurrent
/// requests at once.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError>;
}
