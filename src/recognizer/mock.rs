/*!
 * Mock recognizer implementation.
 *
 * Returns a canned transcript (or a canned failure) for every request:
 * - `MockRecognizer::new(transcription)` - always succeeds
 * - `MockRecognizer::failing(message)` - always fails with an API error
 *
 * Used by the test suite and by `serve --mock-transcript` for offline demos.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::RecognizerError;
use crate::recognizer::{AudioInput, Recognizer};
use crate::transcript::{Transcription, parse_segments_json};

/// Behavior mode for the mock recognizer
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always returns this transcript
    Working(Transcription),
    /// Always fails with this message
    Failing(String),
}

/// Mock recognizer for testing the service without a speech engine
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    behavior: MockBehavior,
    /// Simulated processing time
    delay: Option<Duration>,
    /// Number of transcribe calls received
    request_count: Arc<AtomicUsize>,
    /// Calls currently in flight
    active: Arc<AtomicUsize>,
    /// Highest number of calls seen in flight at once
    max_active: Arc<AtomicUsize>,
}

impl MockRecognizer {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always returns `transcription`
    pub fn new(transcription: Transcription) -> Self {
        Self::with_behavior(MockBehavior::Working(transcription))
    }

    /// Create a mock that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Failing(message.into()))
    }

    /// Load a canned transcript from a JSON file.
    ///
    /// The file holds either a serialized transcription or just its segments;
    /// in the latter case the language is reported as "en".
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock transcript: {}", path.display()))?;

        let transcription = match serde_json::from_str::<Transcription>(&content) {
            Ok(transcription) => transcription,
            Err(_) => Transcription {
                segments: parse_segments_json(&content)?,
                language: "en".to_string(),
                language_probability: 1.0,
                duration: None,
            },
        };

        Ok(Self::new(transcription))
    }

    /// Sleep this long inside every transcribe call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    async fn transcribe(&self, audio: AudioInput) -> Result<Transcription, RecognizerError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if audio.data.is_empty() {
            return Err(RecognizerError::InvalidAudio(format!("'{}' is empty", audio.file_name)));
        }

        match &self.behavior {
            MockBehavior::Working(transcription) => Ok(transcription.clone()),
            MockBehavior::Failing(message) => Err(RecognizerError::ApiError {
                status_code: 500,
                message: message.clone(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), RecognizerError> {
        match &self.behavior {
            MockBehavior::Working(_) => Ok(()),
            MockBehavior::Failing(message) => Err(RecognizerError::ConnectionError(message.clone())),
        }
    }
}
