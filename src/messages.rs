use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// @module: JSON bodies exchanged between the service and its clients

/// Successful `POST /transcribe/` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// Always "success"; failures are plain-text bodies with a non-2xx status
    pub status: String,
    /// Detected language code
    pub language: String,
    /// Confidence of the language detection, 0.0 to 1.0
    pub language_probability: f64,
    /// Wall-clock seconds spent handling the request
    pub processing_time: f64,
    /// The rendered SubRip document
    pub srt_content: String,
}

impl TranscriptionResponse {
    pub fn success(
        language: impl Into<String>,
        language_probability: f64,
        processing_time: f64,
        srt_content: impl Into<String>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            language: language.into(),
            language_probability,
            processing_time,
            srt_content: srt_content.into(),
        }
    }
}

/// `GET /` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
    pub status: String,
    pub endpoints: BTreeMap<String, String>,
}

impl ServiceStatus {
    pub fn running() -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert("transcribe".to_string(), "/transcribe/".to_string());

        Self {
            message: "Audio Transcription API".to_string(),
            status: "running".to_string(),
            endpoints,
        }
    }
}
