//! OpenAI compatible transcription client
//!
//! Posts WAV audio to `{base_url}/audio/transcriptions` as multipart form
//! data, the request shape shared by OpenAI, Groq, LocalAI, faster-whisper
//! servers and friends.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{Transcription, TranscriptionClient, TranscriptionError, TranscriptionRequest};

const TRANSCRIPTIONS_PATH: &str = "audio/transcriptions";

/// Transcription API response (`response_format=json`)
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for one configured endpoint.
///
/// Cloning is cheap and clones share the underlying connection pool, so a
/// single client serves every in-flight request of an entity.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAiClient {
    /// Build a client for `base_url` with reqwest's default settings.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, TranscriptionError> {
        let http = Client::builder()
            .build()
            .map_err(|e| TranscriptionError::InvalidRequest(e.to_string()))?;
        Self::with_http_client(http, base_url, api_key)
    }

    /// Build a client on top of an existing reqwest client (shared pool).
    pub fn with_http_client(
        http: Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, TranscriptionError> {
        let endpoint = transcriptions_endpoint(base_url)?;
        let api_key = api_key.filter(|k| !k.trim().is_empty());

        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Resolve the transcriptions endpoint below `base_url`.
///
/// `https://api.openai.com/v1` and `https://api.openai.com/v1/` both yield
/// `https://api.openai.com/v1/audio/transcriptions`.
pub fn transcriptions_endpoint(base_url: &str) -> Result<Url, TranscriptionError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    Url::parse(&base)
        .and_then(|url| url.join(TRANSCRIPTIONS_PATH))
        .map_err(|e| TranscriptionError::InvalidRequest(format!("base url {:?}: {}", base_url, e)))
}

#[async_trait]
impl TranscriptionClient for OpenAiClient {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        log::info!(
            "Transcribing audio file: {} ({} bytes, model={}, language={:?})",
            request.file_name,
            request.audio.len(),
            request.model,
            request.language
        );

        let file_part = Part::bytes(request.audio)
            .file_name(request.file_name)
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::InvalidRequest(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", request.model)
            .text("response_format", "json");
        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        let mut builder = self.http.post(self.endpoint.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let body: TranscriptionResponse = response
                .json()
                .await
                .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

            log::info!("Transcription successful: {} chars", body.text.len());

            Ok(Transcription {
                text: body.text,
                language: body.language,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();

            let message =
                if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                    error_response.error.message
                } else {
                    error_text
                };

            Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let url = transcriptions_endpoint("https://api.openai.com/v1/").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/audio/transcriptions");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let url = transcriptions_endpoint("http://localhost:8000/v1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/v1/audio/transcriptions");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = transcriptions_endpoint("not a url").unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidRequest(_)));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_absent() {
        let client = OpenAiClient::new("http://localhost:8000/v1/", Some("  ".to_string())).unwrap();
        assert!(!client.has_api_key());
        let client = OpenAiClient::new("http://localhost:8000/v1/", Some("sk-x".to_string())).unwrap();
        assert!(client.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAiClient::new("http://localhost/v1/", Some("sk-secret".to_string())).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("redacted"));
    }
}
