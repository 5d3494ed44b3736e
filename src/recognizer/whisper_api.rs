use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::app_config::RecognizerConfig;
use crate::errors::RecognizerError;
use crate::language_utils;
use crate::recognizer::{AudioInput, Recognizer};
use crate::transcript::{Segment, Transcription, Word};

/// Client for an OpenAI-compatible `/audio/transcriptions` endpoint
///
/// Works with faster-whisper servers and whisper.cpp's server, which both
/// return `verbose_json` with segment and word timestamps.
#[derive(Debug)]
pub struct WhisperApiRecognizer {
    /// Base URL of the API, without the `/audio/transcriptions` suffix
    base_url: String,
    /// Bearer token; empty for local servers
    api_key: String,
    /// Model name sent with every request
    model: String,
    /// Language forced on the recognizer instead of auto-detection
    language: Option<String>,
    /// Beam size for decoding
    beam_size: u32,
    /// Sampling temperature
    temperature: f32,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts on connection failures
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// `verbose_json` transcription response
#[derive(Debug, Deserialize)]
pub struct VerboseTranscription {
    /// Detected language, as a code or an English name depending on the server
    #[serde(default)]
    pub language: Option<String>,
    /// Language detection confidence (faster-whisper servers only)
    #[serde(default)]
    pub language_probability: Option<f64>,
    /// Audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Full transcript text
    #[serde(default)]
    pub text: String,
    /// Segment-level results
    #[serde(default)]
    pub segments: Vec<ApiSegment>,
    /// Word-level results when the server reports them at top level
    #[serde(default)]
    pub words: Vec<ApiWord>,
}

/// Segment entry of a `verbose_json` response
#[derive(Debug, Deserialize)]
pub struct ApiSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Option<Vec<ApiWord>>,
}

/// Word entry of a `verbose_json` response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl From<ApiWord> for Word {
    fn from(word: ApiWord) -> Self {
        Word::new(word.word, word.start, word.end)
    }
}

impl WhisperApiRecognizer {
    /// Create a new recognizer client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RecognizerError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            language: None,
            beam_size: 5,
            temperature: 0.0,
            client,
            max_retries: 2,
            backoff_base_ms: 1000,
        })
    }

    /// Create a recognizer client from configuration
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, RecognizerError> {
        let mut recognizer = Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.timeout_secs,
        )?;
        recognizer.language = config.language.clone();
        recognizer.beam_size = config.beam_size;
        recognizer.temperature = config.temperature;
        Ok(recognizer)
    }

    /// Force the transcription language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Override retry behaviour
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }

    fn build_form(&self, audio: &AudioInput) -> Result<Form, RecognizerError> {
        let mut part = Part::bytes(audio.data.to_vec()).file_name(audio.file_name.clone());
        if let Some(content_type) = &audio.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| RecognizerError::InvalidAudio(format!("Bad content type '{}': {}", content_type, e)))?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .text("timestamp_granularities[]", "word")
            .text("temperature", self.temperature.to_string())
            .text("beam_size", self.beam_size.to_string());

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        Ok(form)
    }

    async fn send_once(&self, audio: &AudioInput) -> Result<VerboseTranscription, RecognizerError> {
        let mut request = self.client.post(self.transcriptions_url()).multipart(self.build_form(audio)?);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, body));
        }

        serde_json::from_str::<VerboseTranscription>(&body).map_err(|e| {
            error!(
                "Failed to parse recognizer response: {}. Raw response (first 500 chars): {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            RecognizerError::ParseError(e.to_string())
        })
    }

    fn status_error(status: StatusCode, body: String) -> RecognizerError {
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            body
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RecognizerError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => RecognizerError::RateLimitExceeded(message),
            _ => RecognizerError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    fn is_retryable(error: &RecognizerError) -> bool {
        matches!(
            error,
            RecognizerError::ConnectionError(_) | RecognizerError::RateLimitExceeded(_)
        )
    }

    /// Convert a `verbose_json` body into the recognizer-neutral model
    pub fn build_transcription(&self, response: VerboseTranscription) -> Transcription {
        let VerboseTranscription {
            language,
            language_probability,
            duration,
            text,
            segments,
            words,
        } = response;

        let mut segments: Vec<Segment> = segments
            .into_iter()
            .map(|segment| Segment {
                start: segment.start,
                end: segment.end,
                text: segment.text,
                words: segment.words.unwrap_or_default().into_iter().map(Word::from).collect(),
            })
            .collect();

        let words: Vec<Word> = words.into_iter().map(Word::from).collect();
        if segments.is_empty() {
            if !words.is_empty() {
                segments.push(Segment::from_words(words));
            } else if !text.trim().is_empty() {
                segments.push(Segment::plain(0.0, duration.unwrap_or(0.0), text));
            }
        } else if segments.iter().all(|s| s.words.is_empty()) && !words.is_empty() {
            attach_words(&mut segments, words);
        }

        let forced = self.language.as_deref();
        let language = language
            .as_deref()
            .or(forced)
            .map(language_utils::normalize_detected_language)
            .unwrap_or_else(|| "unknown".to_string());
        let language_probability = language_probability
            .unwrap_or(if forced.is_some() { 1.0 } else { 0.0 });

        Transcription {
            segments,
            language,
            language_probability,
            duration,
        }
    }
}

/// Distribute top-level words over segments.
///
/// Each word goes to the first segment whose end lies after the word's start;
/// words past the last segment stay with the last one. Both inputs are in
/// chronological order, so a single forward cursor suffices.
fn attach_words(segments: &mut [Segment], words: Vec<Word>) {
    let last = segments.len().saturating_sub(1);
    let mut index = 0;

    for word in words {
        while index < last && word.start >= segments[index].end {
            index += 1;
        }
        if let Some(segment) = segments.get_mut(index) {
            segment.words.push(word);
        }
    }
}

#[async_trait]
impl Recognizer for WhisperApiRecognizer {
    async fn transcribe(&self, audio: AudioInput) -> Result<Transcription, RecognizerError> {
        if audio.data.is_empty() {
            return Err(RecognizerError::InvalidAudio(format!("'{}' is empty", audio.file_name)));
        }

        let mut attempt = 0;
        loop {
            match self.send_once(&audio).await {
                Ok(response) => {
                    let transcription = self.build_transcription(response);
                    debug!(
                        "Recognizer returned {} segments for '{}' (language: {})",
                        transcription.segments.len(),
                        audio.file_name,
                        transcription.language
                    );
                    return Ok(transcription);
                }
                Err(e) if attempt < self.max_retries && Self::is_retryable(&e) => {
                    attempt += 1;
                    let delay = self.backoff_base_ms * 2u64.pow(attempt - 1);
                    warn!("Recognizer request failed ({}), retrying in {}ms ({}/{})", e, delay, attempt, self.max_retries);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn test_connection(&self) -> Result<(), RecognizerError> {
        let mut request = self.client.get(format!("{}/models", self.base_url));
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::status_error(status, body))
        }
    }
}
