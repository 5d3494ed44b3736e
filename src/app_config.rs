use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use log::warn;
use url::Url;

use crate::grouping::GroupingConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech recognizer backend settings
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Words-per-cue bounds
    #[serde(default)]
    pub grouping: GroupingConfig,

    /// Client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// CORS origins; "*" allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Speech recognizer backend configuration
///
/// The backend is any server exposing an OpenAI-compatible
/// `/audio/transcriptions` endpoint (faster-whisper or whisper.cpp servers).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecognizerConfig {
    /// Base URL of the API, e.g. "http://localhost:8000/v1"
    #[serde(default = "default_recognizer_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_recognizer_model")]
    pub model: String,

    /// API key, sent as a bearer token when non-empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Force a language instead of auto-detection (ISO code)
    #[serde(default)]
    pub language: Option<String>,

    /// Beam size for decoding
    #[serde(default = "default_beam_size")]
    pub beam_size: u32,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_recognizer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_recognizer_endpoint(),
            model: default_recognizer_model(),
            api_key: String::new(),
            language: None,
            beam_size: default_beam_size(),
            temperature: 0.0,
            timeout_secs: default_recognizer_timeout_secs(),
        }
    }
}

/// Transcription client configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the transcription service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds; transcription of long files is slow
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_client_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024 // 100 MiB
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_recognizer_endpoint() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_recognizer_model() -> String {
    "Systran/faster-whisper-base".to_string()
}

fn default_beam_size() -> u32 {
    5
}

fn default_recognizer_timeout_secs() -> u64 {
    600
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_client_timeout_secs() -> u64 {
    900
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.grouping.validate().context("Invalid grouping settings")?;

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be non-zero"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(anyhow!("max_upload_bytes must be non-zero"));
        }

        Url::parse(&self.recognizer.endpoint)
            .with_context(|| format!("Invalid recognizer endpoint: {}", self.recognizer.endpoint))?;
        Url::parse(&self.client.api_url)
            .with_context(|| format!("Invalid client api_url: {}", self.client.api_url))?;

        if self.recognizer.model.trim().is_empty() {
            return Err(anyhow!("Recognizer model must not be empty"));
        }
        if self.recognizer.beam_size == 0 {
            return Err(anyhow!("Recognizer beam_size must be at least 1"));
        }
        if let Some(language) = &self.recognizer.language {
            crate::language_utils::normalize_to_part1_or_part2t(language)
                .context("Invalid recognizer language")?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            recognizer: RecognizerConfig::default(),
            grouping: GroupingConfig::default(),
            client: ClientConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
