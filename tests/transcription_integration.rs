//! Integration tests for the transcription entity
//!
//! These tests drive `OpenAiCompatibleSttEntity` end to end: chunk stream in,
//! multipart request out, `SpeechResult` back.
//!
//! ## Running Tests
//!
//! ### Mock tests (no API key needed, uses a local HTTP responder):
//! ```bash
//! cargo test --test transcription_integration mock_
//! ```
//!
//! ### Integration tests (requires API key):
//! ```bash
//! export OPENAI_API_KEY=sk-your-key
//! cargo test --test transcription_integration integration_
//! ```

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use openai_compatible_stt::config_entries::{ConfigEntry, EntryData};
use openai_compatible_stt::transcription::{
    Transcription, TranscriptionClient, TranscriptionError, TranscriptionRequest,
};
use openai_compatible_stt::{
    AudioStream, OpenAiClient, OpenAiCompatibleSttEntity, SpeechMetadata, SpeechResult,
    SpeechToTextEntity,
};

// ============================================================================
// Helpers
// ============================================================================

/// Minimal HTTP/1.1 responder: answers every request with one canned
/// response and keeps the raw requests for inspection.
struct FakeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FakeServer {
    async fn start(status: u16, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let captured = captured.clone();
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    captured.lock().await.push(request);

                    let response = format!(
                        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/v1/", addr),
            requests,
        }
    }

    async fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().await.clone()
    }
}

/// Read one request: headers, then a Content-Length or chunked body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            return data;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());

    loop {
        let complete = match content_length {
            Some(len) => data.len() >= header_end + len,
            None => data.ends_with(b"0\r\n\r\n"),
        };
        if complete {
            return data;
        }
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            return data;
        }
        data.extend_from_slice(&buf[..n]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    find(haystack, needle.as_bytes()).is_some()
}

fn entry(base_url: &str, api_key: Option<&str>) -> ConfigEntry {
    ConfigEntry::new(
        "OpenAI Compatible STT (test, whisper-1)",
        EntryData {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            model: "whisper-1".to_string(),
            unique_id: Some("127.0.0.1_whisper-1".to_string()),
        },
    )
}

fn entity_for(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleSttEntity {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let client =
        OpenAiClient::with_http_client(http, base_url, api_key.map(str::to_string)).unwrap();
    OpenAiCompatibleSttEntity::new(&entry(base_url, api_key), Arc::new(client))
}

fn pcm(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn audio(chunks: Vec<Vec<u8>>) -> AudioStream {
    stream::iter(chunks.into_iter().map(Bytes::from)).boxed()
}

// ============================================================================
// Mock Tests - No API key required
// ============================================================================

mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn mock_successful_transcription_returns_text() {
        let server = FakeServer::start(200, r#"{"text":"turn on the kitchen lights"}"#).await;
        let entity = entity_for(&server.base_url, Some("sk-test"));

        let result = entity
            .process_audio_stream(
                SpeechMetadata::pcm16_mono("en"),
                audio(vec![pcm(&[1, 2, 3]), pcm(&[4, 5])]),
            )
            .await;

        assert_eq!(result, SpeechResult::success("turn on the kitchen lights"));

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        let head = String::from_utf8_lossy(request).to_lowercase();
        assert!(head.starts_with("post /v1/audio/transcriptions "));
        assert!(head.contains("authorization: bearer sk-test"));
        assert!(head.contains("multipart/form-data"));
        assert!(contains(request, "name=\"model\""));
        assert!(contains(request, "whisper-1"));
        assert!(contains(request, "name=\"language\""));
        assert!(contains(request, "name=\"file\""));
        assert!(contains(request, "audio/wav"));
        assert!(contains(request, "RIFF"));
    }

    #[tokio::test]
    async fn mock_no_api_key_sends_no_authorization() {
        let server = FakeServer::start(200, r#"{"text":"ok"}"#).await;
        let entity = entity_for(&server.base_url, None);

        let result = entity
            .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(vec![pcm(&[1])]))
            .await;
        assert!(result.is_success());

        let requests = server.requests().await;
        let head = String::from_utf8_lossy(&requests[0]).to_lowercase();
        assert!(!head.contains("authorization:"));
    }

    #[tokio::test]
    async fn mock_empty_stream_makes_no_request() {
        let server = FakeServer::start(200, r#"{"text":"never"}"#).await;
        let entity = entity_for(&server.base_url, Some("sk-test"));

        let result = entity
            .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(vec![]))
            .await;

        assert_eq!(result, SpeechResult::error());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(server.requests().await.is_empty());
    }

    #[tokio::test]
    async fn mock_api_error_returns_error_result() {
        let server = FakeServer::start(
            401,
            r#"{"error":{"message":"Invalid API key","type":"invalid_request_error"}}"#,
        )
        .await;
        let entity = entity_for(&server.base_url, Some("sk-wrong"));

        let result = entity
            .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(vec![pcm(&[1, 2])]))
            .await;

        assert_eq!(result, SpeechResult::error());
    }

    #[tokio::test]
    async fn mock_api_error_message_is_parsed() {
        let server = FakeServer::start(401, r#"{"error":{"message":"Invalid API key"}}"#).await;
        let client = OpenAiClient::with_http_client(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            &server.base_url,
            Some("sk-wrong".to_string()),
        )
        .unwrap();

        let err = client
            .transcribe(TranscriptionRequest {
                model: "whisper-1".to_string(),
                language: None,
                audio: vec![0; 44],
                file_name: "audio.wav".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            TranscriptionError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn mock_malformed_response_is_parse_error() {
        let server = FakeServer::start(200, "this is not json").await;
        let client = OpenAiClient::with_http_client(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            &server.base_url,
            None,
        )
        .unwrap();

        let err = client
            .transcribe(TranscriptionRequest {
                model: "whisper-1".to_string(),
                language: Some("en".to_string()),
                audio: vec![0; 44],
                file_name: "audio.wav".to_string(),
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err, TranscriptionError::Parse(_)),
            "Expected Parse error, got: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn mock_network_failure_returns_error_result() {
        // Reserve a port, then close it so connections are refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let entity = entity_for(&format!("http://{}/v1/", addr), Some("sk-test"));
        let result = entity
            .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(vec![pcm(&[1, 2])]))
            .await;

        assert_eq!(result, SpeechResult::error());
    }

    #[tokio::test]
    async fn mock_staging_files_do_not_leak() {
        let dir = tempfile::tempdir().unwrap();
        let ok = FakeServer::start(200, r#"{"text":"ok"}"#).await;
        let failing = FakeServer::start(500, r#"{"error":{"message":"boom"}}"#).await;

        for base_url in [&ok.base_url, &failing.base_url] {
            let entity = entity_for(base_url, None).with_staging_dir(dir.path());
            entity
                .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(vec![pcm(&[9])]))
                .await;
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Echoes the decoded samples back as text, after yielding so that
    /// concurrent requests interleave.
    struct EchoSamplesClient;

    #[async_trait]
    impl TranscriptionClient for EchoSamplesClient {
        async fn transcribe(
            &self,
            request: TranscriptionRequest,
        ) -> Result<Transcription, TranscriptionError> {
            tokio::task::yield_now().await;
            let mut reader = hound::WavReader::new(Cursor::new(request.audio))
                .map_err(|e| TranscriptionError::Parse(e.to_string()))?;
            let samples: Vec<String> = reader
                .samples::<i16>()
                .map(|s| s.map(|v| v.to_string()))
                .collect::<Result<_, _>>()
                .map_err(|e| TranscriptionError::Parse(e.to_string()))?;
            Ok(Transcription {
                text: samples.join(","),
                language: None,
            })
        }
    }

    fn interleaved(chunks: Vec<Vec<u8>>) -> AudioStream {
        stream::iter(chunks)
            .then(|chunk| async move {
                tokio::task::yield_now().await;
                Bytes::from(chunk)
            })
            .boxed()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn mock_concurrent_requests_do_not_mix_buffers() {
        let entity = Arc::new(OpenAiCompatibleSttEntity::new(
            &entry("http://127.0.0.1:1/v1/", None),
            Arc::new(EchoSamplesClient),
        ));

        let a = {
            let entity = entity.clone();
            tokio::spawn(async move {
                entity
                    .process_audio_stream(
                        SpeechMetadata::pcm16_mono("en"),
                        interleaved(vec![pcm(&[1, 2]), pcm(&[3]), pcm(&[4, 5, 6])]),
                    )
                    .await
            })
        };
        let b = {
            let entity = entity.clone();
            tokio::spawn(async move {
                entity
                    .process_audio_stream(
                        SpeechMetadata::pcm16_mono("en"),
                        interleaved(vec![pcm(&[-1]), pcm(&[-2, -3]), pcm(&[-4])]),
                    )
                    .await
            })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a, SpeechResult::success("1,2,3,4,5,6"));
        assert_eq!(b, SpeechResult::success("-1,-2,-3,-4"));
    }
}

// ============================================================================
// Integration Tests - Require OPENAI_API_KEY
// ============================================================================

mod integration_tests {
    use super::*;

    fn api_key() -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    }

    #[tokio::test]
    async fn integration_silence_is_transcribed() {
        let Some(key) = api_key() else {
            eprintln!("Skipping integration_silence_is_transcribed: OPENAI_API_KEY not set");
            return;
        };

        let entity = entity_for("https://api.openai.com/v1/", Some(&key));
        // one second of 16 kHz silence in 100 ms chunks
        let chunks = (0..10).map(|_| vec![0u8; 3200]).collect();

        let result = entity
            .process_audio_stream(SpeechMetadata::pcm16_mono("en"), audio(chunks))
            .await;

        assert!(result.is_success(), "Expected success, got: {:?}", result);
    }
}
