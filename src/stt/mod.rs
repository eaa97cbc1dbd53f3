//! Host-side speech-to-text contract.
//!
//! Any type providing the capability lists and `process_audio_stream` can be
//! registered with the host as a speech-to-text entity.

mod entity;
mod types;

pub use entity::{AudioStream, DeviceInfo, SpeechToTextEntity};
pub use types::{
    AudioBitRates, AudioChannels, AudioCodecs, AudioFormats, AudioSampleRates, SpeechMetadata,
    SpeechResult, SpeechResultState,
};
