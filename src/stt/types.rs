//! Audio capability and result types exchanged with the host.

use serde::{Deserialize, Serialize};

/// Container formats the host can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormats {
    Wav,
    Ogg,
}

/// Codecs the host can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodecs {
    Pcm,
    Opus,
}

/// Sample widths in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AudioBitRates {
    Bitrate8,
    Bitrate16,
    Bitrate24,
    Bitrate32,
}

impl AudioBitRates {
    pub fn bits(&self) -> u16 {
        match self {
            AudioBitRates::Bitrate8 => 8,
            AudioBitRates::Bitrate16 => 16,
            AudioBitRates::Bitrate24 => 24,
            AudioBitRates::Bitrate32 => 32,
        }
    }
}

impl From<AudioBitRates> for u16 {
    fn from(rate: AudioBitRates) -> Self {
        rate.bits()
    }
}

impl TryFrom<u16> for AudioBitRates {
    type Error = String;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bitrate8),
            16 => Ok(Self::Bitrate16),
            24 => Ok(Self::Bitrate24),
            32 => Ok(Self::Bitrate32),
            other => Err(format!("Unsupported bit rate: {}", other)),
        }
    }
}

/// Sample rates in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AudioSampleRates {
    Samplerate8000,
    Samplerate11000,
    Samplerate16000,
    Samplerate18900,
    Samplerate22000,
    Samplerate32000,
    Samplerate37800,
    Samplerate44100,
    Samplerate48000,
}

impl AudioSampleRates {
    pub fn hz(&self) -> u32 {
        match self {
            AudioSampleRates::Samplerate8000 => 8000,
            AudioSampleRates::Samplerate11000 => 11000,
            AudioSampleRates::Samplerate16000 => 16000,
            AudioSampleRates::Samplerate18900 => 18900,
            AudioSampleRates::Samplerate22000 => 22000,
            AudioSampleRates::Samplerate32000 => 32000,
            AudioSampleRates::Samplerate37800 => 37800,
            AudioSampleRates::Samplerate44100 => 44100,
            AudioSampleRates::Samplerate48000 => 48000,
        }
    }
}

impl From<AudioSampleRates> for u32 {
    fn from(rate: AudioSampleRates) -> Self {
        rate.hz()
    }
}

impl TryFrom<u32> for AudioSampleRates {
    type Error = String;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        match hz {
            8000 => Ok(Self::Samplerate8000),
            11000 => Ok(Self::Samplerate11000),
            16000 => Ok(Self::Samplerate16000),
            18900 => Ok(Self::Samplerate18900),
            22000 => Ok(Self::Samplerate22000),
            32000 => Ok(Self::Samplerate32000),
            37800 => Ok(Self::Samplerate37800),
            44100 => Ok(Self::Samplerate44100),
            48000 => Ok(Self::Samplerate48000),
            other => Err(format!("Unsupported sample rate: {}", other)),
        }
    }
}

/// Channel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AudioChannels {
    Mono,
    Stereo,
}

impl AudioChannels {
    pub fn count(&self) -> u16 {
        match self {
            AudioChannels::Mono => 1,
            AudioChannels::Stereo => 2,
        }
    }
}

impl From<AudioChannels> for u16 {
    fn from(channels: AudioChannels) -> Self {
        channels.count()
    }
}

impl TryFrom<u16> for AudioChannels {
    type Error = String;

    fn try_from(count: u16) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            other => Err(format!("Unsupported channel count: {}", other)),
        }
    }
}

/// Describes the audio the host is about to stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechMetadata {
    pub language: String,
    pub format: AudioFormats,
    pub codec: AudioCodecs,
    pub bit_rate: AudioBitRates,
    pub sample_rate: AudioSampleRates,
    pub channel: AudioChannels,
}

impl SpeechMetadata {
    /// 16 kHz mono 16-bit PCM in a WAV container.
    pub fn pcm16_mono(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            format: AudioFormats::Wav,
            codec: AudioCodecs::Pcm,
            bit_rate: AudioBitRates::Bitrate16,
            sample_rate: AudioSampleRates::Samplerate16000,
            channel: AudioChannels::Mono,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechResultState {
    Success,
    Error,
}

/// Outcome of one transcription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResult {
    pub text: String,
    pub result: SpeechResultState,
}

impl SpeechResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            result: SpeechResultState::Success,
        }
    }

    pub fn error() -> Self {
        Self {
            text: String::new(),
            result: SpeechResultState::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == SpeechResultState::Success
    }
}
