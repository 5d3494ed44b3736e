/*!
 * Error types for the srtscribe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The subtitle
 * rendering core has no error type of its own: it performs no I/O and treats
 * malformed recognizer output as a precondition violation.
 */

use thiserror::Error;

/// Errors that can occur when talking to a speech recognizer
#[derive(Error, Debug)]
pub enum RecognizerError {
    /// Error when building or sending the request fails
    #[error("Recognizer request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a recognizer response fails
    #[error("Failed to parse recognizer response: {0}")]
    ParseError(String),

    /// Error returned by the recognizer API itself
    #[error("Recognizer responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The uploaded audio was rejected before reaching the recognizer
    #[error("Invalid audio input: {0}")]
    InvalidAudio(String),
}

/// Errors raised by the HTTP transcription service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The multipart form carried no `file` field
    #[error("No audio file was uploaded (expected multipart field 'file')")]
    MissingFile,

    /// The multipart body could not be read
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The upload exceeded the configured body limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// The recognizer failed to transcribe the audio
    #[error("{0}")]
    Recognizer(#[from] RecognizerError),
}

/// Errors raised by the transcription client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the connection dropped
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status
    #[error("Service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Plain-text error body from the service
        message: String,
    },

    /// The service response was not the expected JSON
    #[error("Failed to parse service response: {0}")]
    ParseError(String),

    /// Local file could not be read
    #[error("File error: {0}")]
    File(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the recognizer
    #[error("Recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// Error from the transcription service
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Error from the transcription client
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<reqwest::Error> for RecognizerError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::ParseError(error.to_string())
        } else if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}
