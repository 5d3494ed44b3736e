/*!
 * # srtscribe - speech recognition to SubRip subtitles
 *
 * A Rust library and service that turns timed speech recognition output into
 * SubRip (.srt) subtitle documents.
 *
 * ## Features
 *
 * - Split each recognized segment into cues of 4 to 6 words (configurable)
 * - Millisecond-exact `HH:MM:SS,mmm` timecodes that never round up
 * - HTTP service accepting audio uploads and returning the document as JSON
 * - OpenAI-compatible Whisper backend, plus a canned recognizer for offline use
 * - Command line client that uploads audio and saves the result
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Recognizer output (segments and word timings)
 * - `grouping`: Word grouping into cue-sized chunks
 * - `subtitle_processor`: Cue construction, timecodes and document assembly
 * - `recognizer`: Speech recognizer seam and its implementations
 * - `server`: HTTP transcription service
 * - `client`: HTTP client for the service
 * - `messages`: JSON bodies shared by service and client
 * - `app_config`: Configuration management
 * - `app_controller`: Workflows behind the command line
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod client;
pub mod errors;
pub mod file_utils;
pub mod grouping;
pub mod language_utils;
pub mod messages;
pub mod recognizer;
pub mod server;
pub mod subtitle_processor;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use grouping::GroupingConfig;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry, generate_srt};
pub use transcript::{Segment, Transcription, Word};
pub use recognizer::{MockRecognizer, Recognizer, WhisperApiRecognizer};
pub use errors::{AppError, ClientError, RecognizerError, ServiceError};
