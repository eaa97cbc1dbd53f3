//! The OpenAI compatible speech-to-text entity
//!
//! Buffers the host's audio stream, stages it as a WAV file and sends it to
//! the configured transcription endpoint. Every failure is logged and
//! reported as `SpeechResult::error()`.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::audio::{AudioError, PcmBuffer, StagedAudio, WavFormat};
use crate::config_entries::ConfigEntry;
use crate::consts::{DEFAULT_LANGUAGE, DOMAIN, ENTITY_ID_FORMAT, MANUFACTURER, SUPPORTED_LANGUAGES};
use crate::platform::slugify;
use crate::stt::{
    AudioBitRates, AudioChannels, AudioCodecs, AudioFormats, AudioSampleRates, AudioStream,
    DeviceInfo, SpeechMetadata, SpeechResult, SpeechToTextEntity,
};
use crate::transcription::{TranscriptionClient, TranscriptionError, TranscriptionRequest};

/// Errors on the processing path; never leave the entity.
#[derive(Debug, thiserror::Error)]
enum ProcessError {
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("staging task failed: {0}")]
    Staging(String),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// One configured speech-to-text provider instance.
pub struct OpenAiCompatibleSttEntity {
    client: Arc<dyn TranscriptionClient>,
    model: String,
    unique_id: String,
    entity_id: String,
    staging_dir: PathBuf,
}

impl OpenAiCompatibleSttEntity {
    pub fn new(entry: &ConfigEntry, client: Arc<dyn TranscriptionClient>) -> Self {
        let model = entry.data.model.clone();

        let unique_id = entry
            .data
            .unique_id
            .clone()
            .or_else(|| entry.unique_id.clone())
            .unwrap_or_else(|| {
                // entries created before unique ids existed
                log::debug!("Entry {} has no unique id, using model", entry.entry_id);
                model.clone()
            });

        Self {
            client,
            entity_id: ENTITY_ID_FORMAT.replace("{}", &slugify(&model)),
            model,
            unique_id,
            staging_dir: std::env::temp_dir(),
        }
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = entity_id.into();
        self
    }

    /// Directory for temporary WAV files (system temp dir by default).
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn transcribe_pcm(
        &self,
        metadata: &SpeechMetadata,
        pcm: Bytes,
    ) -> Result<String, ProcessError> {
        let format = WavFormat::from(metadata);
        let dir = self.staging_dir.clone();

        let staged = tokio::task::spawn_blocking(move || StagedAudio::create_in(&dir, &pcm, &format))
            .await
            .map_err(|e| ProcessError::Staging(e.to_string()))??;

        let audio = staged.read().await?;
        let language = Some(metadata.language.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        let request = TranscriptionRequest {
            model: self.model.clone(),
            language,
            audio,
            file_name: staged.file_name(),
        };

        let result = self.client.transcribe(request).await;

        if let Err(e) = staged.close() {
            log::warn!("Failed to remove staged audio: {}", e);
        }

        Ok(result?.text)
    }
}

#[async_trait]
impl SpeechToTextEntity for OpenAiCompatibleSttEntity {
    fn name(&self) -> String {
        self.model.clone()
    }

    fn unique_id(&self) -> Option<String> {
        Some(self.unique_id.clone())
    }

    fn entity_id(&self) -> Option<String> {
        Some(self.entity_id.clone())
    }

    fn device_info(&self) -> Option<DeviceInfo> {
        Some(DeviceInfo {
            identifiers: BTreeSet::from([(DOMAIN.to_string(), self.unique_id.clone())]),
            model: self.model.clone(),
            manufacturer: MANUFACTURER.to_string(),
        })
    }

    fn default_language(&self) -> Option<String> {
        Some(DEFAULT_LANGUAGE.to_string())
    }

    fn supported_languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
    }

    fn supported_formats(&self) -> Vec<AudioFormats> {
        vec![AudioFormats::Wav]
    }

    fn supported_codecs(&self) -> Vec<AudioCodecs> {
        vec![AudioCodecs::Pcm]
    }

    fn supported_bit_rates(&self) -> Vec<AudioBitRates> {
        vec![AudioBitRates::Bitrate16]
    }

    fn supported_sample_rates(&self) -> Vec<AudioSampleRates> {
        vec![AudioSampleRates::Samplerate16000]
    }

    fn supported_channels(&self) -> Vec<AudioChannels> {
        vec![AudioChannels::Mono]
    }

    async fn process_audio_stream(
        &self,
        metadata: SpeechMetadata,
        stream: AudioStream,
    ) -> SpeechResult {
        let buffer = PcmBuffer::from_stream(stream).await;

        if buffer.is_empty() {
            log::warn!(
                "{}: no audio received ({} chunks), skipping transcription",
                self.entity_id,
                buffer.chunk_count()
            );
            return SpeechResult::error();
        }

        log::debug!(
            "{}: received {} bytes in {} chunks",
            self.entity_id,
            buffer.len(),
            buffer.chunk_count()
        );

        match self.transcribe_pcm(&metadata, buffer.into_bytes()).await {
            Ok(text) => SpeechResult::success(text),
            Err(e) => {
                log::error!("{}: transcription failed: {}", self.entity_id, e);
                SpeechResult::error()
            }
        }
    }
}
