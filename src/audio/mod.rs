//! Audio handling for OpenAI Compatible STT
//!
//! This module buffers the host's chunked PCM stream, wraps it in a WAV
//! container (hound) and stages it in a temporary file (tempfile) for upload.

mod buffer;
mod staging;
pub mod wav;

pub use buffer::PcmBuffer;
pub use staging::StagedAudio;
pub use wav::{encode_wav, WavFormat};

/// Errors that can occur while preparing audio for upload.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),
    #[error("Failed to encode WAV: {0}")]
    Encode(#[from] hound::Error),
    #[error("Staging file error: {0}")]
    Io(#[from] std::io::Error),
}
