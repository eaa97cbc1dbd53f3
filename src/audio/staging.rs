//! Temporary WAV files handed to the transcription client.
//!
//! A `StagedAudio` owns its file; dropping it deletes the file, so every
//! exit path of a request (success, error, early return, unwinding) cleans
//! up after itself.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::wav::{write_wav, WavFormat};
use super::AudioError;

const STAGING_PREFIX: &str = "openai_stt_";
const STAGING_SUFFIX: &str = ".wav";

/// A WAV file on disk that lives exactly as long as this value.
#[derive(Debug)]
pub struct StagedAudio {
    file: NamedTempFile,
    frames: u32,
}

impl StagedAudio {
    /// Stage `pcm` as a WAV file in the system temp directory.
    pub fn create(pcm: &[u8], format: &WavFormat) -> Result<Self, AudioError> {
        Self::create_in(&std::env::temp_dir(), pcm, format)
    }

    /// Stage `pcm` as a WAV file in `dir`.
    pub fn create_in(dir: &Path, pcm: &[u8], format: &WavFormat) -> Result<Self, AudioError> {
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dir)?;

        // On error `file` is dropped here and the partial file removed
        let frames = write_wav(BufWriter::new(file.as_file_mut()), pcm, format)?;

        log::debug!(
            "Staged {} frame(s) of audio at {:?}",
            frames,
            file.path()
        );

        Ok(Self { file, frames })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Frames written (samples per channel).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// File name for the multipart upload.
    pub fn file_name(&self) -> String {
        self.path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string()
    }

    /// Read the complete WAV file back.
    pub async fn read(&self) -> Result<Vec<u8>, AudioError> {
        Ok(tokio::fs::read(self.path()).await?)
    }

    /// Delete the file now, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<PathBuf, AudioError> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_16k() -> WavFormat {
        WavFormat {
            channels: 1,
            sample_rate: 16000,
        }
    }

    #[tokio::test]
    async fn test_staged_file_contains_wav() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedAudio::create_in(dir.path(), &[1, 0, 2, 0], &mono_16k()).unwrap();

        assert!(staged.path().exists());
        assert!(staged.file_name().starts_with(STAGING_PREFIX));
        assert!(staged.file_name().ends_with(STAGING_SUFFIX));
        assert_eq!(staged.frames(), 2);

        let bytes = staged.read().await.unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedAudio::create_in(dir.path(), &[1, 0], &mono_16k()).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedAudio::create_in(dir.path(), &[1, 0], &mono_16k()).unwrap();
        let path = staged.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_encode_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = WavFormat {
            channels: 0,
            sample_rate: 16000,
        };
        assert!(StagedAudio::create_in(dir.path(), &[1, 0], &bad).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
