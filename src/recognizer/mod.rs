/*!
 * Speech recognizer backends.
 *
 * The subtitle core never talks to a recognizer; the transcription service
 * holds one behind the [`Recognizer`] trait so it can be swapped for a mock:
 * - `whisper_api`: OpenAI-compatible transcription server over HTTP
 * - `mock`: canned transcripts for tests and offline demos
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::RecognizerError;
use crate::transcript::Transcription;

/// One uploaded audio file
#[derive(Debug, Clone)]
pub struct AudioInput {
    /// Original file name, used for format sniffing by the backend
    pub file_name: String,
    /// MIME type reported by the uploader, if any
    pub content_type: Option<String>,
    /// Raw file contents
    pub data: Bytes,
}

impl AudioInput {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Common trait for all speech recognizers
///
/// Implementations turn one audio file into chronologically ordered segments,
/// with word timing where the backend provides it.
#[async_trait]
pub trait Recognizer: Send + Sync + Debug {
    /// Transcribe one audio file
    async fn transcribe(&self, audio: AudioInput) -> Result<Transcription, RecognizerError>;

    /// Test the connection to the recognizer
    async fn test_connection(&self) -> Result<(), RecognizerError>;
}

pub mod whisper_api;
pub mod mock;

pub use mock::MockRecognizer;
pub use whisper_api::WhisperApiRecognizer;
