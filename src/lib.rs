//! OpenAI Compatible STT
//!
//! Speech-to-text provider for home automation hosts, backed by any service
//! exposing the OpenAI `audio/transcriptions` API.
//!
//! - [`config_flow`]: the setup wizard that validates and deduplicates
//!   connection settings and persists them as a [`ConfigEntry`].
//! - [`platform::async_setup_entry`]: builds one
//!   [`OpenAiCompatibleSttEntity`] per entry at host startup.
//! - [`SpeechToTextEntity::process_audio_stream`]: buffers the host's audio,
//!   wraps it in WAV and returns the transcribed text.
//!
//! Logging goes through the `log` facade; the host installs the logger.

pub mod audio;
pub mod config_entries;
pub mod config_flow;
pub mod consts;
pub mod entity;
pub mod platform;
pub mod stt;
pub mod transcription;

pub use config_entries::{ConfigEntry, ConfigEntryStore, EntryData, JsonFileEntryStore, MemoryEntryStore};
pub use config_flow::{ConfigFlow, FlowResult, UserInput};
pub use entity::OpenAiCompatibleSttEntity;
pub use platform::{async_setup_entry, AddEntities, EntityRegistry, SetupError};
pub use stt::{AudioStream, SpeechMetadata, SpeechResult, SpeechResultState, SpeechToTextEntity};
pub use transcription::{OpenAiClient, TranscriptionClient, TranscriptionError};
