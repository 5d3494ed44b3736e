use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::client::{self, TranscriptionClient};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::recognizer::{MockRecognizer, Recognizer, WhisperApiRecognizer};
use crate::server;
use crate::subtitle_processor::SubtitleCollection;
use crate::transcript::parse_segments_json;

// @module: Application controller for the transcription workflows

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self, AppError> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pick the recognizer backing the service
    ///
    /// A canned transcript file switches the service to the mock recognizer,
    /// otherwise audio is forwarded to the configured Whisper endpoint.
    pub fn build_recognizer(&self, mock_transcript: Option<&Path>) -> Result<Arc<dyn Recognizer>, AppError> {
        match mock_transcript {
            Some(path) => {
                info!("Serving canned transcript from {:?}", path);
                let mock = MockRecognizer::from_json_file(path)?;
                Ok(Arc::new(mock))
            }
            None => {
                let recognizer = WhisperApiRecognizer::from_config(&self.config.recognizer)?;
                debug!(
                    "Using recognizer at {} (model: {})",
                    self.config.recognizer.endpoint, self.config.recognizer.model
                );
                Ok(Arc::new(recognizer))
            }
        }
    }

    /// Run the HTTP service until interrupted
    pub async fn run_server(&self, mock_transcript: Option<PathBuf>) -> Result<(), AppError> {
        let recognizer = self.build_recognizer(mock_transcript.as_deref())?;

        if let Err(e) = recognizer.test_connection().await {
            warn!("Recognizer is not reachable yet: {}", e);
        }

        server::serve(&self.config, recognizer).await?;
        Ok(())
    }

    /// Upload an audio file to the service and save the returned document
    ///
    /// Returns the path written, or `None` when the service produced no cues.
    pub async fn run_transcribe(
        &self,
        audio_file: &Path,
        output: Option<PathBuf>,
        print: bool,
    ) -> Result<Option<PathBuf>, AppError> {
        if !FileManager::file_exists(audio_file) {
            return Err(AppError::File(format!("Audio file does not exist: {:?}", audio_file)));
        }

        let service = TranscriptionClient::from_config(&self.config.client)?;
        info!("Transcribing {:?} via {}", audio_file, service.api_url());

        let spinner = Self::spinner(format!(
            "Transcribing {}",
            audio_file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        ));
        let result = service.transcribe_file(audio_file).await;
        spinner.finish_and_clear();

        let response = result?;
        info!("{}", client::status_message(&response));

        if print {
            print!("{}", response.srt_content);
        }

        if response.srt_content.trim().is_empty() {
            warn!("The service returned no subtitles for {:?}; nothing saved", audio_file);
            return Ok(None);
        }

        let cue_count = SubtitleCollection::parse_srt_string(&response.srt_content)
            .map(|entries| entries.len())
            .context("Service returned a malformed SubRip document")?;

        let output_path = output.unwrap_or_else(|| FileManager::srt_output_path(audio_file, None));
        client::save_srt(&response.srt_content, &output_path)?;

        info!("Saved {} cues to {:?}", cue_count, output_path);
        Ok(Some(output_path))
    }

    /// Render a recognizer transcript JSON file offline
    ///
    /// Writes to `output` when given, otherwise prints the document.
    pub fn run_render(&self, input: &Path, output: Option<PathBuf>) -> Result<usize, AppError> {
        let content = FileManager::read_to_string(input)?;
        let segments = parse_segments_json(&content)
            .with_context(|| format!("Failed to parse transcript {:?}", input))?;

        let subtitles = SubtitleCollection::from_segments(&segments, &self.config.grouping);
        debug!("Rendered {} segments into {} cues", segments.len(), subtitles.entries.len());

        match output {
            Some(path) => {
                subtitles.write_to_srt(&path)?;
                info!("Saved {} cues to {:?}", subtitles.entries.len(), path);
            }
            None => print!("{}", subtitles.to_srt_string()),
        }

        Ok(subtitles.entries.len())
    }

    fn spinner(message: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .or_else(|_| ProgressStyle::default_spinner().template("{spinner} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}
