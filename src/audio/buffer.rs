//! Accumulates host audio fragments into one contiguous PCM buffer.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

/// Growable buffer for one request's audio.
///
/// Not shared: every request builds its own buffer, so concurrent requests
/// never observe each other's bytes.
#[derive(Debug, Default)]
pub struct PcmBuffer {
    data: BytesMut,
    chunks: u64,
}

impl PcmBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `stream` to exhaustion, appending every chunk in arrival order.
    pub async fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Bytes>,
    {
        let mut buffer = Self::new();
        futures_util::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            buffer.push(&chunk);
        }
        buffer
    }

    /// Append a chunk. Returns the number of chunks received so far.
    pub fn push(&mut self, chunk: &[u8]) -> u64 {
        self.data.extend_from_slice(chunk);
        self.chunks += 1;
        self.chunks
    }

    /// Number of chunks received, including empty ones.
    pub fn chunk_count(&self) -> u64 {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}
