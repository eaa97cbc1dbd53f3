//! The contract a speech-to-text provider offers the host.

use std::collections::BTreeSet;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::Serialize;

use super::types::{
    AudioBitRates, AudioChannels, AudioCodecs, AudioFormats, AudioSampleRates, SpeechMetadata,
    SpeechResult,
};

/// Audio delivered by the host, one fragment at a time, ending when the
/// host signals end of input.
pub type AudioStream = BoxStream<'static, Bytes>;

/// Device the entity is grouped under in the host's registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, unique_id)` pairs
    pub identifiers: BTreeSet<(String, String)>,
    pub model: String,
    pub manufacturer: String,
}

/// A speech-to-text provider.
///
/// The `supported_*` lists are consumed by the host during negotiation; a
/// request is only forwarded to `process_audio_stream` when its metadata
/// passes `check_metadata`.
#[async_trait]
pub trait SpeechToTextEntity: Send + Sync {
    fn name(&self) -> String;

    /// Stable identity across restarts.
    fn unique_id(&self) -> Option<String> {
        None
    }

    /// Requested entity id; the host generates one when `None`.
    fn entity_id(&self) -> Option<String> {
        None
    }

    fn device_info(&self) -> Option<DeviceInfo> {
        None
    }

    fn supported_languages(&self) -> Vec<String>;
    fn supported_formats(&self) -> Vec<AudioFormats>;
    fn supported_codecs(&self) -> Vec<AudioCodecs>;
    fn supported_bit_rates(&self) -> Vec<AudioBitRates>;
    fn supported_sample_rates(&self) -> Vec<AudioSampleRates>;
    fn supported_channels(&self) -> Vec<AudioChannels>;

    fn default_language(&self) -> Option<String> {
        None
    }

    /// Whether this entity accepts audio described by `metadata`.
    fn check_metadata(&self, metadata: &SpeechMetadata) -> bool {
        self.supported_languages()
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&metadata.language))
            && self.supported_formats().contains(&metadata.format)
            && self.supported_codecs().contains(&metadata.codec)
            && self.supported_bit_rates().contains(&metadata.bit_rate)
            && self.supported_sample_rates().contains(&metadata.sample_rate)
            && self.supported_channels().contains(&metadata.channel)
    }

    /// Consume `stream` and transcribe it. Failures are reported through
    /// the result state, never returned as errors.
    async fn process_audio_stream(
        &self,
        metadata: SpeechMetadata,
        stream: AudioStream,
    ) -> SpeechResult;
}
