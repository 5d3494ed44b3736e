use anyhow::{Result, anyhow};
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::app_config::ClientConfig;
use crate::errors::ClientError;
use crate::file_utils::{FileManager, FileType};
use crate::messages::{ServiceStatus, TranscriptionResponse};

// @module: Client for the transcription service

/// HTTP client for the transcription service
///
/// Uploads one audio file and hands back the rendered document as opaque
/// text; it knows nothing about cue structure.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    /// Base URL of the service, e.g. "http://localhost:8080"
    api_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl TranscriptionClient {
    /// Create a new client
    pub fn new(api_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone(), config.timeout_secs)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Query the service status endpoint
    pub async fn status(&self) -> Result<ServiceStatus, ClientError> {
        let response = self.client.get(format!("{}/", self.api_url)).send().await?;
        Self::decode(response).await
    }

    /// Upload an audio file from disk
    pub async fn transcribe_file<P: AsRef<Path>>(&self, path: P) -> Result<TranscriptionResponse, ClientError> {
        let path = path.as_ref();

        if FileManager::detect_file_type(path) != FileType::Audio {
            warn!("{:?} does not look like an audio file; uploading anyway", path);
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::File(format!("Failed to read {:?}: {}", path, e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        self.transcribe_bytes(file_name, data).await
    }

    /// Upload in-memory audio
    pub async fn transcribe_bytes(
        &self,
        file_name: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<TranscriptionResponse, ClientError> {
        let file_name = file_name.into();
        debug!("Uploading '{}' ({} bytes) to {}", file_name, data.len(), self.api_url);

        let form = Form::new().part("file", Part::bytes(data).file_name(file_name));
        let response = self
            .client
            .post(format!("{}/transcribe/", self.api_url))
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

/// One-line summary of a finished transcription
pub fn status_message(response: &TranscriptionResponse) -> String {
    format!(
        "Transcription completed in {:.2}s (Language: {}, Probability: {:.2})",
        response.processing_time, response.language, response.language_probability
    )
}

/// Persist a document verbatim; refuses blank content
pub fn save_srt<P: AsRef<Path>>(content: &str, path: P) -> Result<()> {
    if content.trim().is_empty() {
        return Err(anyhow!("No content to save"));
    }
    FileManager::write_to_file(path, content)
}
