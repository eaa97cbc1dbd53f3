//! Wraps raw PCM16 little-endian audio in a WAV container using hound.

use std::io::{Cursor, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};

use super::AudioError;
use crate::stt::SpeechMetadata;

/// Sample width used for every staged file, whatever the host declared.
pub const BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;

/// Channel layout and rate of the PCM being wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

impl WavFormat {
    pub fn spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        }
    }

    /// Bytes per frame (one sample for every channel).
    fn frame_bytes(&self) -> usize {
        BYTES_PER_SAMPLE * self.channels.max(1) as usize
    }
}

impl From<&SpeechMetadata> for WavFormat {
    fn from(metadata: &SpeechMetadata) -> Self {
        Self {
            channels: metadata.channel.count(),
            sample_rate: metadata.sample_rate.hz(),
        }
    }
}

/// Write `pcm` as a complete WAV file to `writer`.
///
/// Trailing bytes that do not form a whole frame are dropped; hound refuses
/// to finalize a file with a partial frame.
pub fn write_wav<W: Write + Seek>(
    writer: W,
    pcm: &[u8],
    format: &WavFormat,
) -> Result<u32, AudioError> {
    if format.channels == 0 || format.sample_rate == 0 {
        return Err(AudioError::InvalidFormat(format!(
            "{} channels at {} Hz",
            format.channels, format.sample_rate
        )));
    }

    let usable = pcm.len() - pcm.len() % format.frame_bytes();
    if usable != pcm.len() {
        log::warn!(
            "Dropping {} trailing byte(s) that do not form a whole frame",
            pcm.len() - usable
        );
    }

    let mut wav = WavWriter::new(writer, format.spec())?;
    for sample in pcm[..usable].chunks_exact(BYTES_PER_SAMPLE) {
        wav.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
    }
    let frames = wav.duration();
    wav.finalize()?;

    Ok(frames)
}

/// Encode `pcm` into an in-memory WAV file.
pub fn encode_wav(pcm: &[u8], format: &WavFormat) -> Result<Vec<u8>, AudioError> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, pcm, format)?;
    Ok(cursor.into_inner())
}
